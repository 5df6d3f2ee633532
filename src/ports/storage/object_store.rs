use crate::domain::{
    errors::StorageResult,
    value_objects::{BucketName, ObjectKey},
};
use async_trait::async_trait;

/// Port for object storage operations
/// This abstracts the actual storage backend (S3 or an S3-compatible service)
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store object data in a single atomic put
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    /// Retrieve object data
    async fn get_object(&self, key: &ObjectKey) -> StorageResult<Vec<u8>>;

    /// List objects with a given prefix
    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>>;
}

/// Information about an object in storage
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: ObjectKey,
    pub size: u64,
    pub last_modified: std::time::SystemTime,
    pub etag: Option<String>,
}

/// How a create-bucket request ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    AlreadyExists,
    AlreadyOwnedByYou,
}

/// Port for creating the destination bucket at sink construction
#[async_trait]
pub trait BucketProvisioner: Send + Sync {
    /// Create `bucket` in `region`. "Already exists" and "already owned"
    /// answers are reported as success variants, not errors.
    async fn create_bucket(
        &self,
        bucket: &BucketName,
        region: &str,
    ) -> StorageResult<BucketCreation>;
}
