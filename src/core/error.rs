//! Error types for the logger core

use super::value::ValueKind;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error while writing an encoded entry
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Codec failed to encode an entry
    #[error("Encode error ({codec}): {message}")]
    EncodeError { codec: String, message: String },

    /// Value accessed through the accessor of another kind
    #[error("value type mismatch: {actual} != {expected}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an encode error for the named codec
    pub fn encode(codec: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::EncodeError {
            codec: codec.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        LoggerError::TypeMismatch { expected, actual }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
