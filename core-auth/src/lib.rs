//! # Authentication
//!
//! Credential access for the remote photo library.
//!
//! ## Overview
//!
//! The sync core never talks to an OAuth flow directly. It consumes the
//! [`AuthProvider`] trait: ask for a valid credential, and if the provider
//! reports it expired, ask for a refresh before using it. The remote
//! connector re-requests a credential before every call rather than holding
//! a token for the lifetime of the run.
//!
//! Two implementations ship here:
//!
//! - [`StoredCredentialProvider`] - loads an authorized-user JSON file
//!   (access token, refresh token, client id/secret, expiry) and refreshes
//!   the access token against the provider's OAuth token endpoint, writing
//!   the rotated token back to disk.
//! - [`StaticCredentialProvider`] - a fixed, never-expiring token for tests.
//!
//! Obtaining the initial authorized-user file (the interactive consent flow)
//! is out of scope; the file is expected to exist before a run starts.

pub mod error;
pub mod provider;
pub mod stored;
pub mod types;

pub use error::{AuthError, Result};
pub use provider::{AuthProvider, StaticCredentialProvider};
pub use stored::StoredCredentialProvider;
pub use types::Credential;
