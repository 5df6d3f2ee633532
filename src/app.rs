use std::sync::Arc;
use tracing::{info, trace, Level};

use crate::{
    adapters::outbound::{
        credentials::{EnvironmentCredentials, SharedProfileCredentials, StaticCredentials},
        storage::{create_s3_store, ApacheObjectStoreAdapter, S3BucketProvisioner, S3Config},
    },
    domain::{
        errors::{ConfigError, StorageError},
        models::{redact_secret, RawSinkSettings, SinkConfig},
    },
    ports::{
        credentials::CredentialSource,
        storage::{BucketCreation, BucketProvisioner, ObjectStore},
    },
    services::{validate_settings, CredentialResolver, LogSinkImpl},
};

/// Assembles one sink instance from the host's raw configuration strings.
///
/// Storage defaults to S3 built from the validated configuration; tests and
/// embedders can inject any `ObjectStore` (and a `BucketProvisioner` to go
/// with it) instead.
pub struct SinkBuilder {
    settings: RawSinkSettings,
    operator_id: usize,
    object_store: Option<Arc<dyn ObjectStore>>,
    provisioner: Option<Arc<dyn BucketProvisioner>>,
}

impl SinkBuilder {
    pub fn new(settings: RawSinkSettings) -> Self {
        Self {
            settings,
            operator_id: 0,
            object_store: None,
            provisioner: None,
        }
    }

    /// Id used to tag this sink's log lines
    pub fn with_operator_id(mut self, operator_id: usize) -> Self {
        self.operator_id = operator_id;
        self
    }

    /// Upload through `store` instead of building an S3 client
    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    /// Create buckets through `provisioner` when auto-creation is enabled
    pub fn with_bucket_provisioner(mut self, provisioner: Arc<dyn BucketProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    /// Pick the single credential source the settings call for.
    ///
    /// A credentials file wins; otherwise any explicit key selects the static
    /// pair; otherwise the process environment is used.
    pub fn credential_chain(settings: &RawSinkSettings) -> CredentialResolver {
        let source: Box<dyn CredentialSource> = if !settings.credential.is_empty() {
            Box::new(SharedProfileCredentials::default_profile(&settings.credential))
        } else if !settings.access_key_id.is_empty() || !settings.secret_access_key.is_empty() {
            Box::new(StaticCredentials::new(
                settings.access_key_id.clone(),
                settings.secret_access_key.clone(),
            ))
        } else {
            Box::new(EnvironmentCredentials::new())
        };

        CredentialResolver::new(vec![source])
    }

    /// Resolve credentials and validate every setting
    pub async fn build_sink_config(
        settings: &RawSinkSettings,
    ) -> Result<SinkConfig, ConfigError> {
        validate_settings(settings, &Self::credential_chain(settings)).await
    }

    /// Validate, connect, and optionally create the bucket
    pub async fn build(self) -> Result<LogSinkImpl, SinkError> {
        let config = Self::build_sink_config(&self.settings).await?;
        if config.log_level.enables(Level::INFO) {
            self.log_settings();
        }

        let (store, provisioner) = match self.object_store {
            Some(store) => (store, self.provisioner),
            None => {
                let s3 = Arc::new(create_s3_store(S3Config::from(&config)).map_err(|e| {
                    SinkError::StorageInit {
                        message: e.to_string(),
                    }
                })?);
                let provisioner = self.provisioner.unwrap_or_else(|| {
                    Arc::new(S3BucketProvisioner::new(s3.clone())) as Arc<dyn BucketProvisioner>
                });
                let store = Arc::new(ApacheObjectStoreAdapter::new(s3)) as Arc<dyn ObjectStore>;
                (store, Some(provisioner))
            }
        };

        if config.auto_create_bucket {
            match provisioner {
                Some(provisioner) => {
                    ensure_bucket(provisioner.as_ref(), &config, self.operator_id).await?
                }
                None if config.log_level.enables(Level::TRACE) => trace!(
                    operator_id = self.operator_id,
                    "no bucket provisioner configured, skipping bucket creation"
                ),
                None => {}
            }
        }

        Ok(LogSinkImpl::new(config, store).with_operator_id(self.operator_id))
    }

    fn log_settings(&self) {
        let id = self.operator_id;
        let s = &self.settings;

        info!("[log-sink {}] Starting s3-log-sink {}", id, env!("CARGO_PKG_VERSION"));
        info!("[log-sink {}] credential parameter = '{}'", id, s.credential);
        info!(
            "[log-sink {}] accessKeyID parameter = '{}'",
            id,
            redact_secret(&s.access_key_id)
        );
        info!(
            "[log-sink {}] secretAccessKey parameter = '{}'",
            id,
            redact_secret(&s.secret_access_key)
        );
        info!("[log-sink {}] bucket parameter = '{}'", id, s.bucket);
        info!("[log-sink {}] s3prefix parameter = '{}'", id, s.s3_prefix);
        info!("[log-sink {}] region parameter = '{}'", id, s.region);
        info!("[log-sink {}] compress parameter = '{}'", id, s.compress);
        info!("[log-sink {}] endpoint parameter = '{}'", id, s.endpoint);
        info!(
            "[log-sink {}] autoCreateBucket parameter = '{}'",
            id, s.auto_create_bucket
        );
        info!("[log-sink {}] logLevel parameter = '{}'", id, s.log_level);
        info!("[log-sink {}] timeZone parameter = '{}'", id, s.time_zone);
    }
}

async fn ensure_bucket(
    provisioner: &dyn BucketProvisioner,
    config: &SinkConfig,
    operator_id: usize,
) -> Result<(), SinkError> {
    let created = provisioner
        .create_bucket(&config.bucket, &config.region)
        .await
        .map_err(SinkError::BucketProvisioning)?;

    let level = match created {
        BucketCreation::Created => Level::INFO,
        _ => Level::TRACE,
    };
    if !config.log_level.enables(level) {
        return Ok(());
    }

    match created {
        BucketCreation::Created => {
            info!(operator_id, bucket = %config.bucket, region = %config.region, "created bucket")
        }
        BucketCreation::AlreadyExists => {
            trace!(operator_id, bucket = %config.bucket, "bucket already exists")
        }
        BucketCreation::AlreadyOwnedByYou => {
            trace!(operator_id, bucket = %config.bucket, "bucket already owned by you")
        }
    }

    Ok(())
}

/// Sink construction failures; all of them are fatal for the route
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Bucket provisioning error: {0}")]
    BucketProvisioning(StorageError),
}
