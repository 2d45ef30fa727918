//! Loopwalk — host error types.

use loopwalk_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the terminal host.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal or file I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine rejected the catalog or a command.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message_is_passed_through() {
        let err = AppError::from(DomainError::UnknownLocation(7));
        assert_eq!(err.to_string(), "unknown location: 7");
    }

    #[test]
    fn test_config_error_names_problem() {
        let err = AppError::Config("LOOPWALK_LOG_FORMAT must be json or pretty".into());
        assert_eq!(
            err.to_string(),
            "configuration error: LOOPWALK_LOG_FORMAT must be json or pretty"
        );
    }
}
