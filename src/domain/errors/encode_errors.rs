use thiserror::Error;

/// Error produced when a log record cannot be rendered as JSON.
///
/// Recoverable: the record is skipped and the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("field '{field}' holds a non-finite float ({value}) that JSON cannot represent")]
    NonFiniteFloat { field: String, value: f64 },

    #[error("failed to serialize record: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Serialization(err.to_string())
    }
}
