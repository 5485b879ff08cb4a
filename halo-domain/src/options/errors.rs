use halo_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Option '{id}' expects {expected} value")]
    TypeMismatch { id: String, expected: String },

    #[error("Options document is not a JSON object")]
    NotAnObject,

    #[error("Options serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
