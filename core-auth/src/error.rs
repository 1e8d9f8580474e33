use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credential file {path} could not be read: {reason}")]
    CredentialsUnavailable { path: String, reason: String },

    #[error("Credential file is malformed: {0}")]
    MalformedCredentials(String),

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Credential store write failed: {0}")]
    PersistFailed(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
