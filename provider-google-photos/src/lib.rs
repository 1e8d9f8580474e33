//! # Google Photos Provider
//!
//! Implements the `PhotoLibrary` trait for the Google Photos Library API v1.
//!
//! ## Overview
//!
//! This module provides:
//! - Paginated listing of the media-item and album catalogs
//! - Album creation
//! - Raw-byte uploads returning upload tokens
//! - Batched media-item creation and album attachment (50 items per call)
//! - Bearer authentication via an injected `AuthProvider`, re-requested
//!   before every call with an opportunistic refresh on expiry

pub mod connector;
pub mod error;
pub mod types;

pub use connector::PhotosConnector;
pub use error::{GooglePhotosError, Result};
