pub mod config;
pub mod credential;
pub mod outcome;
pub mod record;

pub use config::{
    keys, parse_bool, CompressionMode, LogLevel, RawSinkSettings, SinkConfig, SinkTimeZone,
};
pub use credential::{redact_secret, Credential, CredentialSourceKind};
pub use outcome::FlushOutcome;
pub use record::{LogRecord, RecordValue};
