//! Error module for the Halo Shell domain layer.
//!
//! Each subsystem has its own error enum; [`DomainError`] wraps them for
//! callers that drive several subsystems at once.

use halo_core::CoreError;
use thiserror::Error;

use crate::app_index::AppIndexError;
use crate::notifications::NotificationError;
use crate::options::OptionsError;
use crate::theming::ThemingError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Theming(#[from] ThemingError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    AppIndex(#[from] AppIndexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_errors_convert_transparently() {
        let err: DomainError = NotificationError::NotFound(4).into();
        assert_eq!(err.to_string(), "Notification with ID '4' not found.");

        let err: DomainError = OptionsError::UnknownOption("bar.nope".to_string()).into();
        assert!(matches!(err, DomainError::Options(_)));
        assert!(err.to_string().contains("bar.nope"));
    }
}
