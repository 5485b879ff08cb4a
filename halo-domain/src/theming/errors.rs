use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemingError {
    #[error("Color extractor '{binary}' could not be started: {source}")]
    ExtractorSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Color extractor exited with {status}: {stderr}")]
    ExtractorFailed { status: String, stderr: String },

    #[error("Color extractor did not finish within {0:?}")]
    ExtractorTimeout(Duration),

    #[error("Color extractor output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Color extractor output is not valid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("Palette '{variant}' lacks the '{role}' color")]
    MissingRole { variant: String, role: String },

    #[error("Palette '{variant}' has an invalid '{role}' color: {value}")]
    InvalidColor { variant: String, role: String, value: String },

    #[error("Theme option '{0}' does not exist")]
    MissingOption(String),
}
