//! # Host Bridge Traits
//!
//! Abstractions that decouple the sync core from its collaborators.
//!
//! ## Overview
//!
//! This crate defines the contracts the reconciliation core consumes but does
//! not implement itself:
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport, implemented per
//!   host (desktop implementation lives in `bridge-desktop`)
//! - [`PhotoLibrary`](photos::PhotoLibrary) - The remote photo-storage service
//!   surface (listing, album creation, raw uploads, batched mutations),
//!   implemented by `provider-google-photos`
//!
//! Keeping both behind traits lets the core be exercised end to end against
//! mock transports and mock libraries in tests.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert transport-specific errors to `BridgeError`
//! and include context (URLs, status codes) in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared behind `Arc` across async call sites.

pub mod error;
pub mod http;
pub mod photos;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use photos::{
    AlbumPage, AlbumRecord, MediaItemPage, MediaItemRecord, PendingMediaItem, PhotoLibrary,
    UploadToken, MAX_BATCH_SIZE,
};
