//! S3 store construction for a sink instance

use object_store::aws::{AmazonS3, AmazonS3Builder};

use super::error::StoreError;
use crate::domain::models::{Credential, SinkConfig};

/// Connection settings for the S3 backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub credential: Credential,
    pub endpoint: Option<String>,
}

impl From<&SinkConfig> for S3Config {
    fn from(config: &SinkConfig) -> Self {
        Self {
            bucket: config.bucket.as_str().to_string(),
            region: config.region.clone(),
            credential: config.credential.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Create an S3 store from configuration.
///
/// A custom endpoint switches to path-style requests, and plain `http://`
/// endpoints are allowed for local S3-compatible services.
pub fn create_s3_store(config: S3Config) -> Result<AmazonS3, StoreError> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region)
        .with_access_key_id(&config.credential.access_key_id)
        .with_secret_access_key(&config.credential.secret_access_key);

    if let Some(token) = &config.credential.session_token {
        builder = builder.with_token(token);
    }

    if let Some(endpoint) = &config.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_virtual_hosted_style_request(false)
            .with_allow_http(endpoint.starts_with("http://"));
    }

    Ok(builder.build()?)
}
