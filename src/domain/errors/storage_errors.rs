use crate::domain::value_objects::{BucketName, ObjectKey};

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// Access denied
    AccessDenied { key: ObjectKey, operation: String },

    /// Bucket could not be created
    BucketCreationFailed {
        bucket: BucketName,
        code: Option<String>,
        message: String,
    },

    /// Validation error
    ValidationError { message: String },

    /// Unsupported operation
    UnsupportedOperation { operation: String, reason: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::AccessDenied { key, operation } => {
                write!(
                    f,
                    "Access denied for operation '{}' on object: {}",
                    operation, key
                )
            }
            StorageError::BucketCreationFailed {
                bucket,
                code,
                message,
            } => match code {
                Some(code) => write!(
                    f,
                    "Failed to create bucket '{}': {} ({})",
                    bucket, message, code
                ),
                None => write!(f, "Failed to create bucket '{}': {}", bucket, message),
            },
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::UnsupportedOperation { operation, reason } => {
                write!(f, "Unsupported operation '{}': {}", operation, reason)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
