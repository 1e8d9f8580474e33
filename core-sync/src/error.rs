use thiserror::Error;

/// Run-level failure taxonomy.
///
/// Every variant is fatal: the run halts with the underlying error, prior
/// successful mutations stay committed remotely, and the next run resumes
/// from the last checkpoint.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Local IO failure on {path}: {reason}")]
    LocalIo { path: String, reason: String },

    #[error("Malformed remote response: {0}")]
    DataShape(String),

    #[error("Catalog persistence failed: {0}")]
    Catalog(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<bridge_traits::error::BridgeError> for SyncError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        use bridge_traits::error::BridgeError;
        match error {
            BridgeError::AuthenticationFailed(msg) => SyncError::Auth(msg),
            BridgeError::MalformedResponse(msg) => SyncError::DataShape(msg),
            other => SyncError::Remote(other.to_string()),
        }
    }
}

impl From<core_catalog::CatalogError> for SyncError {
    fn from(error: core_catalog::CatalogError) -> Self {
        match error {
            core_catalog::CatalogError::Provider(inner) => inner.into(),
            other => SyncError::Catalog(other.to_string()),
        }
    }
}
