//! Error types for the color handler

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The caller's context was cancelled before the record was handled
    #[error("record rejected: {reason}")]
    Cancelled { reason: String },

    /// A write was asked to emit something that cannot be turned into bytes
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The sink accepted fewer bytes than it was given
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: usize, expected: usize },

    /// IO error reported by the sink, with the operation that triggered it
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create a cancellation error carrying the context's reason
    pub fn cancelled(reason: impl Into<String>) -> Self {
        LoggerError::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LoggerError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a short write error
    pub fn short_write(written: usize, expected: usize) -> Self {
        LoggerError::ShortWrite { written, expected }
    }

    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this failure came from the caller's context rather than the sink
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoggerError::Cancelled { .. })
    }
}
