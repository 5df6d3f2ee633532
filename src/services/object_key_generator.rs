use chrono::{DateTime, Utc};

use crate::domain::{
    errors::ValidationError,
    models::{CompressionMode, SinkConfig, SinkTimeZone},
    value_objects::ObjectKey,
};

const DATE_FORMAT: &str = "%Y%m%d";
const HOUR_FORMAT: &str = "%H";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Derives `{prefix}/{YYYYMMDD}/{HH}/{YYYYMMDDHHMMSS}{.log|.log.gz}` keys.
///
/// Keys have second precision and no uniqueness token: two flushes in the
/// same second under the same prefix write the same key.
#[derive(Debug, Clone)]
pub struct ObjectKeyGenerator {
    prefix: String,
    time_zone: SinkTimeZone,
    compression: CompressionMode,
}

impl ObjectKeyGenerator {
    pub fn new(prefix: impl Into<String>, time_zone: SinkTimeZone, compression: CompressionMode) -> Self {
        Self {
            prefix: prefix.into(),
            time_zone,
            compression,
        }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(config.prefix.clone(), config.time_zone, config.compression)
    }

    pub fn generate(&self, now: DateTime<Utc>) -> Result<ObjectKey, ValidationError> {
        let local = self.time_zone.localize(now);

        let date = local.format(DATE_FORMAT).to_string();
        let hour = local.format(HOUR_FORMAT).to_string();
        let file_name = format!(
            "{}{}",
            local.format(TIMESTAMP_FORMAT),
            self.compression.file_extension()
        );

        ObjectKey::from_segments([self.prefix.as_str(), &date, &hour, &file_name])
    }
}
