use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{level_filters::LevelFilter, Level};

use crate::domain::{errors::ConfigError, models::Credential, value_objects::BucketName};

/// Configuration keys as the host exposes them
pub mod keys {
    pub const CREDENTIAL: &str = "Credential";
    pub const ACCESS_KEY_ID: &str = "AccessKeyID";
    pub const SECRET_ACCESS_KEY: &str = "SecretAccessKey";
    pub const BUCKET: &str = "Bucket";
    pub const S3_PREFIX: &str = "S3Prefix";
    pub const REGION: &str = "Region";
    pub const COMPRESS: &str = "Compress";
    pub const ENDPOINT: &str = "Endpoint";
    pub const AUTO_CREATE_BUCKET: &str = "AutoCreateBucket";
    pub const LOG_LEVEL: &str = "LogLevel";
    pub const TIME_ZONE: &str = "TimeZone";
}

/// Unvalidated configuration strings for one sink route.
///
/// Missing keys are empty strings, which is how the host reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSinkSettings {
    #[serde(rename = "Credential")]
    pub credential: String,
    #[serde(rename = "AccessKeyID")]
    pub access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
    #[serde(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "S3Prefix")]
    pub s3_prefix: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Compress")]
    pub compress: String,
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "AutoCreateBucket")]
    pub auto_create_bucket: String,
    #[serde(rename = "LogLevel")]
    pub log_level: String,
    #[serde(rename = "TimeZone")]
    pub time_zone: String,
}

impl RawSinkSettings {
    /// Read every key through the host's config lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            credential: get(keys::CREDENTIAL),
            access_key_id: get(keys::ACCESS_KEY_ID),
            secret_access_key: get(keys::SECRET_ACCESS_KEY),
            bucket: get(keys::BUCKET),
            s3_prefix: get(keys::S3_PREFIX),
            region: get(keys::REGION),
            compress: get(keys::COMPRESS),
            endpoint: get(keys::ENDPOINT),
            auto_create_bucket: get(keys::AUTO_CREATE_BUCKET),
            log_level: get(keys::LOG_LEVEL),
            time_zone: get(keys::TIME_ZONE),
        }
    }
}

/// Payload encoding of uploaded batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMode {
    #[default]
    Plain,
    Gzip,
}

impl CompressionMode {
    /// Only the exact string `gzip` selects compression; anything else,
    /// including typos, falls back to plain text.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "gzip" => CompressionMode::Gzip,
            _ => CompressionMode::Plain,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            CompressionMode::Plain => ".log",
            CompressionMode::Gzip => ".log.gz",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            CompressionMode::Plain => "application/x-ndjson",
            CompressionMode::Gzip => "application/gzip",
        }
    }
}

impl std::fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionMode::Plain => write!(f, "plain"),
            CompressionMode::Gzip => write!(f, "gzip"),
        }
    }
}

/// Sink log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Panic,
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Whether a sink at this verbosity emits events of `level`
    pub fn enables(&self, level: Level) -> bool {
        level <= self.as_level_filter()
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// Time zone used to partition object keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkTimeZone {
    /// The process's local zone
    #[default]
    Local,
    Named(chrono_tz::Tz),
}

impl SinkTimeZone {
    /// Empty and `Local` mean the process zone; everything else must be an
    /// IANA zone name.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() || name == "Local" {
            return Ok(SinkTimeZone::Local);
        }

        name.parse::<chrono_tz::Tz>()
            .map(SinkTimeZone::Named)
            .map_err(|e| ConfigError::InvalidTimeZone {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Wall-clock time in this zone
    pub fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            SinkTimeZone::Local => instant.with_timezone(&chrono::Local).naive_local(),
            SinkTimeZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

impl std::fmt::Display for SinkTimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkTimeZone::Local => write!(f, "Local"),
            SinkTimeZone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// Validated, immutable configuration of one sink instance
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub credential: Credential,
    pub bucket: BucketName,
    pub prefix: String,
    pub region: String,
    pub compression: CompressionMode,
    pub endpoint: Option<String>,
    pub auto_create_bucket: bool,
    pub log_level: LogLevel,
    pub time_zone: SinkTimeZone,
}

/// Boolean parsing with the accepted spellings of the host's config format
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
