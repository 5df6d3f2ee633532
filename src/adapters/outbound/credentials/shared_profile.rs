use async_trait::async_trait;
use aws_config::profile::{
    profile_file::{ProfileFileKind, ProfileFiles},
    ProfileFileCredentialsProvider,
};
use std::path::PathBuf;

use super::provide;
use crate::{
    domain::{
        errors::CredentialError,
        models::{Credential, CredentialSourceKind},
    },
    ports::credentials::CredentialSource,
};

pub const DEFAULT_PROFILE: &str = "default";

const SOURCE_NAME: &str = "SharedCredentials";

/// Reads a named profile from one shared credentials file.
///
/// Only the given file is consulted; the user's default `~/.aws` files and
/// `AWS_PROFILE` play no part.
#[derive(Debug, Clone)]
pub struct SharedProfileCredentials {
    path: PathBuf,
    profile: String,
}

impl SharedProfileCredentials {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }

    /// The `default` profile of the given file
    pub fn default_profile(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_PROFILE)
    }

    fn provider(&self) -> ProfileFileCredentialsProvider {
        let files = ProfileFiles::builder()
            .with_file(ProfileFileKind::Credentials, &self.path)
            .build();

        ProfileFileCredentialsProvider::builder()
            .profile_files(files)
            .profile_name(&self.profile)
            .build()
    }
}

#[async_trait]
impl CredentialSource for SharedProfileCredentials {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn resolve(&self) -> Result<Credential, CredentialError> {
        provide(
            &self.provider(),
            SOURCE_NAME,
            CredentialSourceKind::SharedProfile,
        )
        .await
    }
}
