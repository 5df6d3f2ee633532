use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn, Level};

use crate::{
    app::{SinkBuilder, SinkError},
    domain::models::{FlushOutcome, LogRecord, RawSinkSettings, SinkConfig},
    ports::services::LogSink,
};

/// Opaque handle the host keeps for one registered output route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkHandle(usize);

impl SinkHandle {
    pub fn operator_id(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-facing table of live sinks, one per configured output route.
///
/// Operator ids are handed out sequentially and never reused, including
/// for registrations that fail.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: RwLock<HashMap<SinkHandle, Arc<dyn LogSink>>>,
    next_id: AtomicUsize,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sink from raw settings and start tracking it
    pub async fn register(&self, settings: RawSinkSettings) -> Result<SinkHandle, SinkError> {
        self.register_builder(SinkBuilder::new(settings)).await
    }

    /// Register a prepared builder; the registry assigns its operator id
    pub async fn register_builder(&self, builder: SinkBuilder) -> Result<SinkHandle, SinkError> {
        let handle = SinkHandle(self.next_id.fetch_add(1, Ordering::SeqCst));

        let sink = builder.with_operator_id(handle.0).build().await?;
        if sink.config().log_level.enables(Level::INFO) {
            info!("[s3operator] id = {}", handle);
        }
        self.sinks.write().await.insert(handle, Arc::new(sink));
        Ok(handle)
    }

    /// Flush `records` through the sink behind `handle`
    pub async fn flush(&self, handle: SinkHandle, records: Vec<LogRecord>) -> FlushOutcome {
        self.flush_at(handle, records, Utc::now()).await
    }

    pub async fn flush_at(
        &self,
        handle: SinkHandle,
        records: Vec<LogRecord>,
        now: DateTime<Utc>,
    ) -> FlushOutcome {
        // Clone out so the lock is not held across the upload
        let sink = self.sinks.read().await.get(&handle).cloned();
        match sink {
            Some(sink) => sink.flush_at(records, now).await,
            None => {
                warn!(operator_id = handle.0, "flush for unknown sink");
                FlushOutcome::Fatal
            }
        }
    }

    /// Validated configuration of the sink behind `handle`
    pub async fn config(&self, handle: SinkHandle) -> Option<SinkConfig> {
        self.sinks
            .read()
            .await
            .get(&handle)
            .map(|sink| sink.config().clone())
    }

    /// Stop tracking a sink; returns whether it was registered
    pub async fn unregister(&self, handle: SinkHandle) -> bool {
        self.sinks.write().await.remove(&handle).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sinks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sinks.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::ApacheObjectStoreAdapter;
    use crate::ports::storage::ObjectStore;
    use object_store::memory::InMemory;

    fn settings(prefix: &str) -> RawSinkSettings {
        RawSinkSettings {
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            bucket: "logs".to_string(),
            s3_prefix: prefix.to_string(),
            region: "us-east-1".to_string(),
            time_zone: "UTC".to_string(),
            ..Default::default()
        }
    }

    fn builder(prefix: &str, store: &Arc<ApacheObjectStoreAdapter>) -> SinkBuilder {
        SinkBuilder::new(settings(prefix)).with_object_store(store.clone())
    }

    #[tokio::test]
    async fn test_sequential_operator_ids() {
        let store = Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())));
        let registry = SinkRegistry::new();

        let first = registry.register_builder(builder("a", &store)).await.unwrap();
        let second = registry.register_builder(builder("b", &store)).await.unwrap();

        assert_eq!(first.operator_id(), 0);
        assert_eq!(second.operator_id(), 1);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_registration_consumes_id() {
        let store = Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())));
        let registry = SinkRegistry::new();

        let bad = SinkBuilder::new(RawSinkSettings {
            bucket: String::new(),
            ..settings("a")
        })
        .with_object_store(store.clone());
        assert!(registry.register_builder(bad).await.is_err());

        let good = registry.register_builder(builder("a", &store)).await.unwrap();
        assert_eq!(good.operator_id(), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_flush_routes_to_sink() {
        let store = Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())));
        let registry = SinkRegistry::new();
        let handle = registry.register_builder(builder("routed", &store)).await.unwrap();

        let outcome = registry
            .flush(handle, vec![LogRecord::new().with("log", "hello")])
            .await;

        assert_eq!(outcome, FlushOutcome::Success);
        assert_eq!(store.list_objects(Some("routed")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_config_lookup() {
        let store = Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())));
        let registry = SinkRegistry::new();
        let handle = registry
            .register_builder(
                SinkBuilder::new(RawSinkSettings {
                    log_level: "error".to_string(),
                    ..settings("quiet")
                })
                .with_object_store(store.clone()),
            )
            .await
            .unwrap();

        let config = registry.config(handle).await.unwrap();
        assert_eq!(config.prefix, "quiet");
        assert_eq!(config.log_level, crate::domain::models::LogLevel::Error);

        registry.unregister(handle).await;
        assert!(registry.config(handle).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_handle_is_fatal() {
        let store = Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())));
        let registry = SinkRegistry::new();
        let handle = registry.register_builder(builder("a", &store)).await.unwrap();

        assert!(registry.unregister(handle).await);
        assert!(!registry.unregister(handle).await);
        assert!(registry.is_empty().await);
        assert_eq!(registry.flush(handle, Vec::new()).await, FlushOutcome::Fatal);
    }
}
