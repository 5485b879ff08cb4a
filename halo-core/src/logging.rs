//! Logging for Halo Shell.
//!
//! Built on the `tracing` ecosystem: a console layer (text or JSON) and an
//! optional daily-rolling file layer, both filtered by the configured level.
//! Services log with the plain `tracing` macros; only the binary calls into
//! this module.

use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive so buffered lines are flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs a stderr subscriber filtered by `RUST_LOG` (default "info").
///
/// Used before the configuration is loaded and as a fallback when
/// [`init_logging`] fails. Errors (e.g. a subscriber already set) are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, LoggingError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(LoggingError::FilterError(format!("Invalid log level in config: {}", other))),
    }
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    utils::fs::ensure_dir_exists(directory)?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("halo-shell.log"));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = if format.eq_ignore_ascii_case("json") {
        Box::new(fmt::layer().json().with_writer(writer).with_ansi(false))
    } else {
        Box::new(fmt::layer().with_writer(writer).with_ansi(false))
    };
    Ok((layer, guard))
}

/// Initializes the global subscriber from a [`LoggingConfig`].
///
/// With `is_reload == false` an already-installed subscriber is an error;
/// with `is_reload == true` it is reported on stderr and ignored.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;

    let console_layer: BoxedLayer = if config.format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    } else {
        fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![console_layer];
    let mut new_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        new_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = new_guard,
        Err(e) => eprintln!("[ERROR] Failed to store log worker guard: {}. File logs may not be flushed.", e),
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging re-initialization attempted; previous subscriber stays active: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_init_minimal_logging_runs_without_panic() {
        init_minimal_logging();
        init_minimal_logging();
        tracing::info!("minimal logging active");
    }

    #[test]
    fn test_parse_level_accepts_known_levels() {
        assert_eq!(parse_level("TRACE").unwrap(), Level::TRACE);
        assert_eq!(parse_level("warn").unwrap(), Level::WARN);
        assert!(matches!(parse_level("loud"), Err(LoggingError::FilterError(_))));
    }

    #[test]
    fn test_create_file_layer_ensures_parent_dir_exists() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("logs/nested/halo.log");
        let (_layer, _guard) = create_file_layer(&log_path, "json").unwrap();
        assert!(dir.path().join("logs/nested").is_dir());
    }

    #[test]
    fn test_init_logging_invalid_level_returns_error() {
        let config = LoggingConfig { level: "loud".to_string(), file_path: None, format: "text".to_string() };
        let err = init_logging(&config, false).unwrap_err();
        assert!(matches!(err, CoreError::Logging(LoggingError::FilterError(_))));
    }

    #[test]
    fn test_init_logging_reload_never_errors() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "debug".to_string(),
            file_path: Some(PathBuf::from(dir.path().join("halo.log"))),
            format: "text".to_string(),
        };
        // Another test may have installed a subscriber already; reload tolerates that.
        assert!(init_logging(&config, true).is_ok());
        assert!(init_logging(&config, true).is_ok());
    }
}
