use async_trait::async_trait;

use crate::domain::{errors::CredentialError, models::Credential};

/// One way of obtaining an access credential.
///
/// Sources are tried in order by the resolver; each one either produces a
/// usable credential or says why it could not.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Attempt resolution
    async fn resolve(&self) -> Result<Credential, CredentialError>;
}
