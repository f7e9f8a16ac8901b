//! Error types for action set generation

use thiserror::Error;

/// Main error type for action set generation
#[derive(Debug, Error)]
pub enum ActionSetError {
    /// A builder input or supplied parameter violates its preconditions
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The parameter supplier's input stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Persisting or loading an action set failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ActionSetError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ActionSetError::InvalidConfiguration(msg.into())
    }
}

/// Result type alias for action set operations
pub type ActionSetResult<T> = Result<T, ActionSetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ActionSetError::invalid("move_amt must be positive");
        assert_eq!(format!("{}", err), "Invalid configuration: move_amt must be positive");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err: ActionSetError = io_err.into();
        assert!(matches!(err, ActionSetError::Io(_)));
    }
}
