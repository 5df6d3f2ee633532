/// Where a credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSourceKind {
    SharedProfile,
    Static,
    Environment,
}

impl std::fmt::Display for CredentialSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CredentialSourceKind::SharedProfile => "SharedCredentials",
            CredentialSourceKind::Static => "StaticCredentials",
            CredentialSourceKind::Environment => "EnvCredentials",
        };
        write!(f, "{}", name)
    }
}

/// Access credential resolved once at sink construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub source: CredentialSourceKind,
}

impl Credential {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        source: CredentialSourceKind,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            source,
        }
    }

    pub fn with_session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token.filter(|t| !t.is_empty());
        self
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &redact_secret(&self.access_key_id))
            .field("secret_access_key", &redact_secret(&self.secret_access_key))
            .field("session_token", &self.session_token.as_ref().map(|_| "..."))
            .field("source", &self.source)
            .finish()
    }
}

/// Shorten a secret for logging: first and last character around an
/// ellipsis, or only the first character for values shorter than three.
pub fn redact_secret(secret: &str) -> String {
    let mut chars = secret.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    if secret.chars().count() >= 3 {
        let last = chars.next_back().unwrap_or(first);
        format!("{}...{}", first, last)
    } else {
        format!("{}...", first)
    }
}
