mod compressor;
mod config_validator;
mod credential_resolver;
mod log_sink_impl;
mod object_key_generator;
mod record_encoder;

pub use compressor::{compress, compress_at, Compressor, ARCHIVE_NAME};
pub use config_validator::validate_settings;
pub use credential_resolver::CredentialResolver;
pub use log_sink_impl::LogSinkImpl;
pub use object_key_generator::ObjectKeyGenerator;
pub use record_encoder::{RecordEncoder, EMPTY_OBJECT};
