//! The credential contract consumed by the remote connector.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Credential;

/// Source of bearer credentials for remote API calls.
///
/// The connector asks for a credential before each call. If the returned
/// credential is marked expired the connector invokes [`refresh`] once and
/// asks again; a refresh failure is fatal for the run.
///
/// [`refresh`]: AuthProvider::refresh
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Return the current credential along with its expiry status.
    async fn valid_credential(&self) -> Result<Credential>;

    /// Exchange the refresh token for a new access token.
    ///
    /// After a successful refresh, `valid_credential` returns the rotated
    /// token with `expired == false`.
    async fn refresh(&self) -> Result<()>;
}

/// A fixed credential that never expires.
///
/// Intended for tests and for callers that manage token lifetimes
/// externally.
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticCredentialProvider {
    async fn valid_credential(&self) -> Result<Credential> {
        Ok(Credential::new(self.token.clone(), false))
    }

    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_never_expires() {
        let provider = StaticCredentialProvider::new("token123");
        let credential = provider.valid_credential().await.unwrap();
        assert_eq!(credential.access_token, "token123");
        assert!(!credential.expired);
        provider.refresh().await.unwrap();
    }
}
