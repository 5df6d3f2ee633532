use crate::domain::{errors::StorageError, value_objects::ObjectKey};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed error response: {0}")]
    Xml(String),

    #[error("Service error: {status} - {code}: {message}")]
    Service {
        status: http::StatusCode,
        code: String,
        message: String,
    },
}

fn key_or_validation(path: &str) -> Result<ObjectKey, StorageError> {
    ObjectKey::new(path.to_string()).map_err(|_| StorageError::ValidationError {
        message: format!("Invalid object path from store: {}", path),
    })
}

/// Map an `object_store` failure from `operation` ("put", "get", ...) to
/// the domain error
pub fn map_store_error(err: object_store::Error, operation: &str) -> StorageError {
    match &err {
        object_store::Error::NotFound { path, .. } => match key_or_validation(path) {
            Ok(key) => StorageError::ObjectNotFound { key },
            Err(e) => e,
        },
        object_store::Error::PermissionDenied { path, .. }
        | object_store::Error::Unauthenticated { path, .. } => match key_or_validation(path) {
            Ok(key) => StorageError::AccessDenied {
                key,
                operation: operation.to_string(),
            },
            Err(e) => e,
        },
        object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
            StorageError::UnsupportedOperation {
                operation: operation.to_string(),
                reason: err.to_string(),
            }
        }
        _ => StorageError::InfrastructureError {
            message: format!("Object store {} failed: {}", operation, err),
            source: Some(err.to_string()),
        },
    }
}

/// Convert object_store errors to domain storage errors when the calling
/// operation is not known
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        map_store_error(err, "unknown")
    }
}

/// Convert infrastructure StoreError to domain StorageError
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectStore(object_err) => object_err.into(),
            StoreError::Transport(e) => StorageError::InfrastructureError {
                message: format!("Request failed: {}", e),
                source: Some(e.to_string()),
            },
            StoreError::Xml(message) => StorageError::InfrastructureError {
                message: format!("Unreadable service response: {}", message),
                source: None,
            },
            StoreError::Service {
                status,
                code,
                message,
            } => StorageError::InfrastructureError {
                message: format!("HTTP error {} ({}): {}", status, code, message),
                source: Some(code),
            },
        }
    }
}
