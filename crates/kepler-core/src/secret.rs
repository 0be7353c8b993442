//! Credential service trait.
//!
//! Defines the interface for resolving the access credential of the hosted
//! conversation service.

/// Service for resolving the API credential.
///
/// Implementations must never log the returned key or include it in error
/// messages. A missing credential is a normal outcome (`Ok(None)`), not an
/// error: the gateway turns it into `CredentialsMissing` when a session is
/// opened.
#[async_trait::async_trait]
pub trait CredentialService: Send + Sync {
    /// Returns the API key if one is configured.
    ///
    /// # Errors
    ///
    /// Returns a message when a configured source exists but cannot be read.
    async fn api_key(&self) -> Result<Option<String>, String>;
}

/// Credential fixed at construction. Used by tests and embedders that
/// already hold a key.
#[derive(Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

#[async_trait::async_trait]
impl CredentialService for StaticCredential {
    async fn api_key(&self) -> Result<Option<String>, String> {
        Ok(self.0.clone())
    }
}
