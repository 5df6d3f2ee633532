use async_trait::async_trait;
use aws_credential_types::Credentials;

use super::provide;
use crate::{
    domain::{
        errors::CredentialError,
        models::{Credential, CredentialSourceKind},
    },
    ports::credentials::CredentialSource,
};

const SOURCE_NAME: &str = "StaticCredentials";

/// An explicit access key / secret key pair from the sink settings.
#[derive(Clone)]
pub struct StaticCredentials {
    access_key_id: String,
    secret_access_key: String,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn resolve(&self) -> Result<Credential, CredentialError> {
        if self.access_key_id.is_empty() {
            return Err(CredentialError::MissingField {
                source_name: SOURCE_NAME,
                field: "AccessKeyID",
            });
        }
        if self.secret_access_key.is_empty() {
            return Err(CredentialError::MissingField {
                source_name: SOURCE_NAME,
                field: "SecretAccessKey",
            });
        }

        let credentials =
            Credentials::from_keys(&self.access_key_id, &self.secret_access_key, None);
        provide(&credentials, SOURCE_NAME, CredentialSourceKind::Static).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_pair() {
        let credential = StaticCredentials::new("AKIA", "secret")
            .resolve()
            .await
            .unwrap();
        assert_eq!(credential.access_key_id, "AKIA");
        assert_eq!(credential.secret_access_key, "secret");
        assert_eq!(credential.session_token, None);
        assert_eq!(credential.source, CredentialSourceKind::Static);
    }

    #[tokio::test]
    async fn test_half_pair_is_rejected() {
        assert!(StaticCredentials::new("AKIA", "").resolve().await.is_err());
        assert!(StaticCredentials::new("", "secret").resolve().await.is_err());
    }
}
