//! # Remote Catalog Cache
//!
//! The run's view of what already exists remotely.
//!
//! ## Overview
//!
//! - [`CatalogSnapshot`](snapshot::CatalogSnapshot) - the in-memory pair of
//!   remote catalogs (media items, albums) with O(1) lookup indices by
//!   filename and title
//! - [`SnapshotStore`](store::SnapshotStore) - durable whole-file JSON
//!   checkpoints of both catalogs, rewritten at album-processing boundaries
//! - [`CatalogCache`](cache::CatalogCache) - produces a snapshot either from
//!   the persisted files or by paginating the remote listing operations,
//!   per-catalog refresh flags deciding which
//!
//! The snapshot always reflects committed remote state as of the last
//! successful checkpoint. It can lag true remote state when a mutation
//! succeeded but the following checkpoint did not; re-running is safe because
//! reconciliation re-queries the reloaded snapshot.

pub mod cache;
pub mod error;
pub mod snapshot;
pub mod store;

pub use cache::{CatalogCache, RefreshPolicy};
pub use error::{CatalogError, Result};
pub use snapshot::CatalogSnapshot;
pub use store::SnapshotStore;
