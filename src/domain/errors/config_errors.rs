use thiserror::Error;

use crate::domain::errors::ValidationError;

/// Failure of a single credential source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CredentialError {
    #[error("{source_name} could not provide credentials: {reason}")]
    Provider {
        source_name: &'static str,
        reason: String,
    },

    #[error("'{field}' is missing from {source_name}")]
    MissingField {
        source_name: &'static str,
        field: &'static str,
    },
}

/// Errors raised while turning raw settings into a `SinkConfig`.
///
/// All of them are fatal for the sink route being configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unable to resolve credentials")]
    CredentialsUnavailable,

    #[error(transparent)]
    InvalidBucket(#[from] ValidationError),

    #[error("Cannot specify empty string to s3prefix")]
    EmptyPrefix,

    #[error("s3prefix does not produce a valid object key: {0}")]
    InvalidPrefix(ValidationError),

    #[error("Cannot specify empty string to region")]
    EmptyRegion,

    #[error(
        "Endpoint '{0}' is not supported for AWS S3. This parameter is intended for S3 compatible services. Use Region instead."
    )]
    DefaultDomainEndpoint(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid timeZone '{name}': {reason}")]
    InvalidTimeZone { name: String, reason: String },
}
