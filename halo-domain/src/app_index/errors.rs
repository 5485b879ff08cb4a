use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppIndexError {
    #[error("Failed to watch application directories: {0}")]
    Watch(#[from] notify::Error),

    #[error("The app index watcher needs a running Tokio runtime")]
    NoRuntime,
}
