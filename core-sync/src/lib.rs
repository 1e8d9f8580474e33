//! # Reconciliation Engine
//!
//! Replicates a local directory tree into the remote photo library as a
//! matching set of albums.
//!
//! ## Overview
//!
//! The pipeline runs strictly sequentially:
//!
//! 1. **Scanner** (`scanner`): walks the local tree, filters media files,
//!    groups directories into logical albums under the configured naming
//!    policy.
//! 2. **Reconciler** (`planner`): diffs each local album against the catalog
//!    snapshot, deciding what must be created, uploaded, or merely linked.
//! 3. **UploadBatcher** (`uploader`): applies a plan through size-bounded
//!    batched mutations, appending every confirmed record to the snapshot.
//! 4. **Coordinator** (`coordinator`): drives the loop album by album,
//!    checkpointing the snapshot around each album's mutations so an
//!    interrupted run resumes without repeating committed work.
//!
//! Failure of any step aborts the run; nothing is retried and nothing is
//! rolled back. Re-running is safe because reconciliation against the
//! reloaded snapshot skips everything the previous run committed.

pub mod coordinator;
pub mod error;
pub mod planner;
pub mod scanner;
pub mod uploader;

pub use coordinator::{RunStats, SyncConfig, SyncCoordinator};
pub use error::{Result, SyncError};
pub use planner::{reconcile, UploadPlan};
pub use scanner::{LocalAlbum, LocalAlbumScanner, LocalFile, ScanConfig};
pub use uploader::UploadBatcher;
