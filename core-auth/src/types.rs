use std::fmt;

/// A bearer credential as seen by the remote connector.
///
/// `expired` reflects the stored expiry at the moment the credential was
/// requested. Callers that see `expired == true` are expected to ask the
/// provider to refresh and then request the credential again.
///
/// # Security
///
/// The `Debug` implementation redacts the token so credentials can appear in
/// logs and error context without leaking secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// The access token used as a bearer token on API requests
    pub access_token: String,
    /// Whether the token's stored expiry has passed
    pub expired: bool,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, expired: bool) -> Self {
        Self {
            access_token: access_token.into(),
            expired,
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("expired", &self.expired)
            .finish()
    }
}
