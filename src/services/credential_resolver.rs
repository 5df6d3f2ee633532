use tracing::debug;

use crate::{
    domain::{errors::ConfigError, models::Credential},
    ports::credentials::CredentialSource,
};

/// Tries an ordered list of credential sources and keeps the first one
/// that yields a credential.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Names of the sources in the order they are tried
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self) -> Result<Credential, ConfigError> {
        for source in &self.sources {
            match source.resolve().await {
                Ok(credential) => {
                    debug!(source = source.name(), "resolved credentials");
                    return Ok(credential);
                }
                Err(err) => {
                    debug!(source = source.name(), error = %err, "credential source failed");
                }
            }
        }

        Err(ConfigError::CredentialsUnavailable)
    }
}
