//! Credential sources, tried in order by the credential resolver

mod environment;
mod shared_profile;
mod static_keys;

pub use environment::EnvironmentCredentials;
pub use shared_profile::{SharedProfileCredentials, DEFAULT_PROFILE};
pub use static_keys::StaticCredentials;

use aws_credential_types::provider::ProvideCredentials;

use crate::domain::{
    errors::CredentialError,
    models::{Credential, CredentialSourceKind},
};

/// Ask an AWS credentials provider once and keep the keys it returns
async fn provide<P>(
    provider: &P,
    source_name: &'static str,
    kind: CredentialSourceKind,
) -> Result<Credential, CredentialError>
where
    P: ProvideCredentials + Sync,
{
    let credentials =
        provider
            .provide_credentials()
            .await
            .map_err(|e| CredentialError::Provider {
                source_name,
                reason: e.to_string(),
            })?;

    Ok(Credential::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        kind,
    )
    .with_session_token(credentials.session_token().map(str::to_string)))
}
