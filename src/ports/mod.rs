pub mod credentials;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use credentials::CredentialSource;
pub use services::LogSink;
pub use storage::{BucketCreation, BucketProvisioner, ObjectInfo, ObjectStore};
