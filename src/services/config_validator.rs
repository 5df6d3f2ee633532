use chrono::Utc;
use tracing::{debug, Level};

use crate::{
    domain::{
        errors::ConfigError,
        models::{
            parse_bool, CompressionMode, LogLevel, RawSinkSettings, SinkConfig, SinkTimeZone,
        },
        value_objects::BucketName,
    },
    services::{CredentialResolver, ObjectKeyGenerator},
};

/// Endpoints under this domain must be configured through the region
const DEFAULT_STORAGE_DOMAIN: &str = "amazonaws.com";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Validate raw settings into a `SinkConfig`.
///
/// Checks run in a fixed order and the first failure is returned:
/// credentials, bucket, prefix, region, compression, endpoint, log level,
/// time zone. An unparsable auto-create flag is not an error. Last, the prefix must yield a storable key;
/// keys are fixed-width after it, so one sample key covers every flush.
pub async fn validate_settings(
    raw: &RawSinkSettings,
    credentials: &CredentialResolver,
) -> Result<SinkConfig, ConfigError> {
    let credential = credentials.resolve().await?;

    let bucket = BucketName::new(raw.bucket.clone())?;

    if raw.s3_prefix.is_empty() {
        return Err(ConfigError::EmptyPrefix);
    }

    if raw.region.is_empty() {
        return Err(ConfigError::EmptyRegion);
    }

    let compression = CompressionMode::from_setting(&raw.compress);

    let endpoint = match raw.endpoint.as_str() {
        "" => None,
        e if e.ends_with(DEFAULT_STORAGE_DOMAIN) => {
            return Err(ConfigError::DefaultDomainEndpoint(e.to_string()))
        }
        e => Some(e.to_string()),
    };

    let log_level = match raw.log_level.as_str() {
        "" => DEFAULT_LOG_LEVEL,
        level => level,
    }
    .parse::<LogLevel>()?;

    let auto_create_bucket = parse_bool(&raw.auto_create_bucket).unwrap_or_else(|| {
        if !raw.auto_create_bucket.is_empty() && log_level.enables(Level::DEBUG) {
            debug!(
                value = %raw.auto_create_bucket,
                "unparsable AutoCreateBucket value, defaulting to false"
            );
        }
        false
    });

    let time_zone = SinkTimeZone::parse(&raw.time_zone)?;

    ObjectKeyGenerator::new(raw.s3_prefix.clone(), time_zone, compression)
        .generate(Utc::now())
        .map_err(ConfigError::InvalidPrefix)?;

    Ok(SinkConfig {
        credential,
        bucket,
        prefix: raw.s3_prefix.clone(),
        region: raw.region.clone(),
        compression,
        endpoint,
        auto_create_bucket,
        log_level,
        time_zone,
    })
}
