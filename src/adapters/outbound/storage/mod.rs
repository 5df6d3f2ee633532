// Infrastructure error types
pub mod error;

// Storage implementations
pub mod apache_object_store_adapter;
pub mod bucket;
pub mod s3;

// Re-export key types
pub use apache_object_store_adapter::ApacheObjectStoreAdapter;
pub use bucket::S3BucketProvisioner;
pub use error::StoreError;
pub use s3::{create_s3_store, S3Config};
