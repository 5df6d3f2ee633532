pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - configuration, records and value objects
pub use domain::{
    BucketName,
    CompressionMode,
    // Errors
    ConfigError,
    Credential,
    CredentialError,
    CredentialSourceKind,
    DomainValidationError,
    EncodeError,
    FlushOutcome,
    LogLevel,
    LogRecord,
    // Value objects
    ObjectKey,
    // Models
    RawSinkSettings,
    RecordValue,
    SinkConfig,
    SinkTimeZone,
    StorageError,
    StorageResult,
};

// Port types - interfaces for external systems
pub use ports::{
    BucketCreation,
    BucketProvisioner,
    // Credential ports
    CredentialSource,
    // Service ports
    LogSink,
    ObjectInfo,
    // Storage ports
    ObjectStore,
};

// Service implementations - business logic
pub use services::{
    validate_settings, Compressor, CredentialResolver, LogSinkImpl, ObjectKeyGenerator,
    RecordEncoder,
};

// Sink assembly
pub use app::{SinkBuilder, SinkError};

// Adapter types - infrastructure implementations
pub use adapters::inbound::host::{SinkHandle, SinkRegistry};
pub use adapters::outbound::credentials::{
    EnvironmentCredentials, SharedProfileCredentials, StaticCredentials,
};
pub use adapters::outbound::storage::{
    create_s3_store, ApacheObjectStoreAdapter, S3BucketProvisioner, S3Config, StoreError,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ApacheObjectStoreAdapter, FlushOutcome, LogRecord, LogSink, LogSinkImpl, ObjectKey,
        ObjectStore, RawSinkSettings, RecordValue, SinkBuilder, SinkConfig, SinkHandle,
        SinkRegistry,
    };
}
