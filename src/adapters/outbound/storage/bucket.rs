use async_trait::async_trait;
use object_store::{aws::AmazonS3, path::Path as ObjectPath, signer::Signer};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use super::error::{map_store_error, StoreError};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::BucketName,
    },
    ports::storage::{BucketCreation, BucketProvisioner},
};

/// Region that takes no LocationConstraint
const DEFAULT_REGION: &str = "us-east-1";

const SIGNATURE_TTL: Duration = Duration::from_secs(300);

/// Error body returned by S3 and compatible services
#[derive(Debug, Deserialize)]
struct S3ErrorResponse {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Creates the sink's bucket with a presigned `PUT` on the bucket root.
///
/// The request is signed by the same store the sink uploads through, so it
/// targets that store's bucket and endpoint.
pub struct S3BucketProvisioner {
    signer: Arc<AmazonS3>,
    http_client: Client,
}

impl S3BucketProvisioner {
    pub fn new(signer: Arc<AmazonS3>) -> Self {
        Self {
            signer,
            http_client: Client::new(),
        }
    }
}

/// Request body for CreateBucket
fn create_bucket_body(region: &str) -> String {
    if region == DEFAULT_REGION {
        String::new()
    } else {
        format!(
            "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
            region
        )
    }
}

/// Interpret a CreateBucket response
fn interpret_response(status: http::StatusCode, body: &str) -> Result<BucketCreation, StoreError> {
    if status.is_success() {
        return Ok(BucketCreation::Created);
    }

    let error: S3ErrorResponse = from_str(body).map_err(|e| StoreError::Xml(e.to_string()))?;
    match error.code.as_str() {
        "BucketAlreadyExists" => Ok(BucketCreation::AlreadyExists),
        "BucketAlreadyOwnedByYou" => Ok(BucketCreation::AlreadyOwnedByYou),
        _ => Err(StoreError::Service {
            status,
            code: error.code,
            message: error.message,
        }),
    }
}

#[async_trait]
impl BucketProvisioner for S3BucketProvisioner {
    async fn create_bucket(
        &self,
        bucket: &BucketName,
        region: &str,
    ) -> StorageResult<BucketCreation> {
        let failed = |code: Option<String>, message: String| StorageError::BucketCreationFailed {
            bucket: bucket.clone(),
            code,
            message,
        };

        let url = self
            .signer
            .signed_url(http::Method::PUT, &ObjectPath::from(""), SIGNATURE_TTL)
            .await
            .map_err(|e| map_store_error(e, "create_bucket"))?;

        let response = self
            .http_client
            .put(url.as_str())
            .body(create_bucket_body(region))
            .send()
            .await
            .map_err(|e| StorageError::from(StoreError::from(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::from(StoreError::from(e)))?;
        trace!(bucket = %bucket, %status, "CreateBucket request result: {}", body);

        interpret_response(status, &body).map_err(|e| match e {
            StoreError::Service { code, message, .. } => failed(Some(code), message),
            other => failed(None, other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_constraint_body() {
        assert_eq!(create_bucket_body("us-east-1"), "");
        let body = create_bucket_body("ap-northeast-1");
        assert!(body.contains("<LocationConstraint>ap-northeast-1</LocationConstraint>"));
    }

    #[test]
    fn test_success_response() {
        assert_eq!(
            interpret_response(http::StatusCode::OK, "").unwrap(),
            BucketCreation::Created
        );
    }

    #[test]
    fn test_existing_bucket_responses() {
        let exists = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <Error><Code>BucketAlreadyExists</Code><Message>taken</Message></Error>";
        assert_eq!(
            interpret_response(http::StatusCode::CONFLICT, exists).unwrap(),
            BucketCreation::AlreadyExists
        );

        let owned = "<Error><Code>BucketAlreadyOwnedByYou</Code><Message>yours</Message>\
            <BucketName>logs</BucketName></Error>";
        assert_eq!(
            interpret_response(http::StatusCode::CONFLICT, owned).unwrap(),
            BucketCreation::AlreadyOwnedByYou
        );
    }

    #[test]
    fn test_other_errors_fail() {
        let denied = "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";
        match interpret_response(http::StatusCode::FORBIDDEN, denied) {
            Err(StoreError::Service { code, message, .. }) => {
                assert_eq!(code, "AccessDenied");
                assert_eq!(message, "Access Denied");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(matches!(
            interpret_response(http::StatusCode::INTERNAL_SERVER_ERROR, "not xml"),
            Err(StoreError::Xml(_))
        ));
    }
}
