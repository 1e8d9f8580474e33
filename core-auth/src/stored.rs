//! File-backed credentials with token refresh.
//!
//! Loads a Google authorized-user JSON file (the format written after an
//! interactive consent flow: access token, refresh token, client id/secret,
//! token endpoint, expiry) and serves it through [`AuthProvider`]. A refresh
//! exchanges the refresh token at the OAuth token endpoint and writes the
//! rotated token back to the same file, so subsequent runs start from the
//! freshest credential.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result};
use crate::provider::AuthProvider;
use crate::types::Credential;

/// Default OAuth token endpoint, used when the credential file omits one
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// On-disk authorized-user credential record.
///
/// Fields beyond the ones interpreted here (scopes, id_token, ...) are
/// carried through `extra` so a rewrite of the file preserves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
    refresh_token: String,
    client_id: String,
    client_secret: String,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl StoredCredentials {
    fn is_expired(&self) -> bool {
        // A record without an expiry is treated as expired so the first call
        // forces a refresh and establishes one.
        match self.expiry {
            Some(expiry) => Utc::now() >= expiry,
            None => true,
        }
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// [`AuthProvider`] backed by an authorized-user JSON file.
pub struct StoredCredentialProvider {
    http_client: Arc<dyn HttpClient>,
    credentials_path: PathBuf,
    state: Mutex<StoredCredentials>,
}

impl std::fmt::Debug for StoredCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentialProvider")
            .field("credentials_path", &self.credentials_path)
            .finish_non_exhaustive()
    }
}

impl StoredCredentialProvider {
    /// Load credentials from `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse as an
    /// authorized-user record.
    pub async fn load(http_client: Arc<dyn HttpClient>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| AuthError::CredentialsUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let credentials: StoredCredentials = serde_json::from_slice(&raw)
            .map_err(|e| AuthError::MalformedCredentials(e.to_string()))?;

        debug!(path = %path.display(), "Loaded stored credentials");

        Ok(Self {
            http_client,
            credentials_path: path,
            state: Mutex::new(credentials),
        })
    }

    fn token_endpoint(credentials: &StoredCredentials) -> String {
        credentials
            .token_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string())
    }

    async fn persist(&self, credentials: &StoredCredentials) -> Result<()> {
        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| AuthError::PersistFailed(e.to_string()))?;
        tokio::fs::write(&self.credentials_path, json)
            .await
            .map_err(|e| AuthError::PersistFailed(e.to_string()))
    }
}

#[async_trait]
impl AuthProvider for StoredCredentialProvider {
    async fn valid_credential(&self) -> Result<Credential> {
        let state = self.state.lock().await;
        Ok(Credential::new(state.token.clone(), state.is_expired()))
    }

    async fn refresh(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", &state.refresh_token);
        params.insert("client_id", &state.client_id);
        params.insert("client_secret", &state.client_secret);

        debug!("Refreshing access token");

        let encoded_body = serde_urlencoded::to_string(&params)
            .map_err(|e| AuthError::TokenRefreshFailed(format!("encode request: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, Self::token_endpoint(&state))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

        if !response.is_success() {
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!(status = response.status, "Token refresh rejected");
            return Err(AuthError::TokenRefreshFailed(format!(
                "Token endpoint returned {}: {}",
                response.status, error_body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenRefreshFailed(format!("parse response: {}", e)))?;

        info!(
            "Refreshed access token (expires in {}s)",
            token_response.expires_in
        );

        state.token = token_response.access_token;
        if let Some(rotated) = token_response.refresh_token {
            state.refresh_token = rotated;
        }
        state.expiry = Some(Utc::now() + Duration::seconds(token_response.expires_in));

        self.persist(&state).await
    }
}
