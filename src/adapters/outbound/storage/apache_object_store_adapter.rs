use async_trait::async_trait;
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, ObjectStore as ApacheObjectStore,
    PutOptions, PutPayload,
};
use std::sync::Arc;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::ObjectKey,
    },
    ports::storage::{ObjectInfo, ObjectStore},
};

use super::error::map_store_error;

/// Adapter that implements our ObjectStore trait using Apache object_store
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        let path = ObjectPath::from(key.as_str());
        let payload = PutPayload::from(data);

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.inner
            .put_opts(&path, payload, options)
            .await
            .map_err(|e| map_store_error(e, "put"))?;

        Ok(())
    }

    async fn get_object(&self, key: &ObjectKey) -> StorageResult<Vec<u8>> {
        let path = ObjectPath::from(key.as_str());

        let result = self.inner.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                StorageError::ObjectNotFound { key: key.clone() }
            }
            _ => map_store_error(e, "get"),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::InfrastructureError {
                message: format!("Failed to read object bytes: {}", e),
                source: Some(e.to_string()),
            })?;

        Ok(bytes.to_vec())
    }

    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>> {
        let prefix_path = prefix.map(ObjectPath::from);

        let mut stream = self.inner.list(prefix_path.as_ref());
        let mut objects = Vec::new();

        while let Some(result) = futures::StreamExt::next(&mut stream).await {
            let meta = result.map_err(|e| map_store_error(e, "list"))?;

            let key = ObjectKey::new(meta.location.to_string()).map_err(|e| {
                StorageError::ValidationError {
                    message: format!("Invalid object key from store: {}", e),
                }
            })?;

            objects.push(ObjectInfo {
                key,
                size: meta.size,
                last_modified: meta.last_modified.into(),
                etag: meta.e_tag.clone(),
            });
        }

        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_put_get_list() {
        let store = Arc::new(InMemory::new());
        let adapter = ApacheObjectStoreAdapter::new(store);

        let key = ObjectKey::new("logs/20240305/08/20240305080709.log".to_string()).unwrap();
        let data = b"{\"log\":\"hello\"}\n".to_vec();

        adapter
            .put_object(&key, data.clone(), Some("application/x-ndjson"))
            .await
            .unwrap();

        let retrieved = adapter.get_object(&key).await.unwrap();
        assert_eq!(retrieved, data);

        let listed = adapter.list_objects(Some("logs")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, key);
        assert_eq!(listed[0].size, data.len() as u64);

        assert!(adapter.list_objects(Some("other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let adapter = ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()));
        let key = ObjectKey::new("missing.log".to_string()).unwrap();

        let err = adapter.get_object(&key).await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound { key: k } if k == key));
    }

    #[tokio::test]
    async fn test_overwrite_same_key() {
        let adapter = ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()));
        let key = ObjectKey::new("p/20240305/08/20240305080709.log".to_string()).unwrap();

        adapter.put_object(&key, b"first\n".to_vec(), None).await.unwrap();
        adapter.put_object(&key, b"second\n".to_vec(), None).await.unwrap();

        assert_eq!(adapter.get_object(&key).await.unwrap(), b"second\n".to_vec());
    }
}
