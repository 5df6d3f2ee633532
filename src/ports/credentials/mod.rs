mod credential_source;

pub use credential_source::CredentialSource;
