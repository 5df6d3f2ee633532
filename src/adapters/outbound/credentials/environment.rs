use async_trait::async_trait;
use aws_config::environment::credentials::EnvironmentVariableCredentialsProvider;
use aws_types::os_shim_internal::Env;
use std::collections::HashMap;

use super::provide;
use crate::{
    domain::{
        errors::CredentialError,
        models::{Credential, CredentialSourceKind},
    },
    ports::credentials::CredentialSource,
};

const SOURCE_NAME: &str = "EnvCredentials";

/// Credentials from the process environment.
///
/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` are preferred, with
/// `AWS_ACCESS_KEY` / `AWS_SECRET_KEY` as fallbacks.
#[derive(Debug, Clone)]
pub struct EnvironmentCredentials {
    env: Env,
}

impl EnvironmentCredentials {
    pub fn new() -> Self {
        Self::with_env(Env::real())
    }

    pub fn with_env(env: Env) -> Self {
        Self { env }
    }

    /// The environment with the older variable names mapped onto the ones
    /// the AWS provider reads, when both halves of a pair are present.
    fn legacy_env(&self) -> Option<Env> {
        let get = |name: &str| self.env.get(name).ok().filter(|v| !v.is_empty());

        let access_key_id = get("AWS_ACCESS_KEY_ID").or_else(|| get("AWS_ACCESS_KEY"))?;
        let secret_access_key =
            get("AWS_SECRET_ACCESS_KEY").or_else(|| get("AWS_SECRET_KEY"))?;

        let mut vars = HashMap::from([
            ("AWS_ACCESS_KEY_ID".to_string(), access_key_id),
            ("AWS_SECRET_ACCESS_KEY".to_string(), secret_access_key),
        ]);
        if let Some(token) = get("AWS_SESSION_TOKEN") {
            vars.insert("AWS_SESSION_TOKEN".to_string(), token);
        }
        Some(Env::from(vars))
    }
}

impl Default for EnvironmentCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSource for EnvironmentCredentials {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn resolve(&self) -> Result<Credential, CredentialError> {
        let provider = EnvironmentVariableCredentialsProvider::new_with_env(self.env.clone());
        match provide(&provider, SOURCE_NAME, CredentialSourceKind::Environment).await {
            Ok(credential) => Ok(credential),
            Err(err) => match self.legacy_env() {
                Some(env) => {
                    let provider = EnvironmentVariableCredentialsProvider::new_with_env(env);
                    provide(&provider, SOURCE_NAME, CredentialSourceKind::Environment).await
                }
                None => Err(err),
            },
        }
    }
}
