//! # Sync Coordinator
//!
//! Drives one full run: snapshot acquisition, local scan, then the
//! album-by-album reconcile/apply loop with checkpoints.
//!
//! ## Workflow
//!
//! 1. Obtain the catalog snapshot (persisted files or paginated fetch)
//! 2. Scan the local tree into logical albums
//! 3. For each album, in scan order:
//!    1. Reconcile the album against the snapshot
//!    2. Checkpoint, so recovery starts from everything committed so far
//!    3. Create the album if the plan has no id
//!    4. Upload pending files and exchange tokens for media items
//!    5. Checkpoint the grown snapshot before linking
//!    6. Attach the deduplicated id set to the album in batches
//!
//! A crash loses at most the in-flight album's uncommitted work; prior
//! albums are always behind a checkpoint. Re-uploading after a crash is safe
//! because reconciliation re-queries the reloaded, updated snapshot.
//!
//! Execution is fully sequential: one remote call at a time, albums in scan
//! order, files in list order, batches one after another.

use bridge_traits::photos::PhotoLibrary;
use core_catalog::{CatalogCache, RefreshPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::planner::reconcile;
use crate::scanner::{LocalAlbumScanner, ScanConfig};
use crate::uploader::UploadBatcher;

/// One run's configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the local album tree
    pub root: PathBuf,

    /// Substring prefix filter on directory paths
    pub folder_prefix: Option<String>,

    /// Monthly naming policy toggle
    pub monthly_albums: bool,

    /// Which catalogs to force-refresh from the remote service
    pub refresh: RefreshPolicy,
}

/// Counters reported at the end of a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Local albums processed
    pub albums_processed: usize,
    /// Remote albums created
    pub albums_created: usize,
    /// Files uploaded and confirmed as media items
    pub files_uploaded: usize,
    /// Distinct media items attached to albums
    pub media_linked: usize,
}

/// Orchestrates a full sync run.
pub struct SyncCoordinator {
    library: Arc<dyn PhotoLibrary>,
    cache: CatalogCache,
}

impl SyncCoordinator {
    /// Create a new sync coordinator
    ///
    /// # Arguments
    ///
    /// * `library` - Remote photo library connector
    /// * `cache` - Catalog cache owning the persisted snapshot files
    pub fn new(library: Arc<dyn PhotoLibrary>, cache: CatalogCache) -> Self {
        Self { library, cache }
    }

    /// Execute one run to completion.
    ///
    /// Any error is fatal and leaves the persisted snapshot at the last
    /// completed checkpoint.
    pub async fn run(&self, config: &SyncConfig) -> Result<RunStats> {
        let mut snapshot = self
            .cache
            .obtain(self.library.as_ref(), config.refresh)
            .await?;

        let scanner = LocalAlbumScanner::new(ScanConfig {
            root: config.root.clone(),
            folder_prefix: config.folder_prefix.clone(),
            monthly_albums: config.monthly_albums,
        });
        let local_albums = scanner.scan()?;
        info!("Found {} local albums", local_albums.len());

        let batcher = UploadBatcher::new(self.library.clone());
        let mut stats = RunStats::default();

        for album in &local_albums {
            info!("Processing album {}", album.name);

            let plan = reconcile(album, &snapshot);
            debug!(
                album = %album.name,
                existing = plan.existing_media_ids.len(),
                pending = plan.pending_uploads.len(),
                "Reconciled album"
            );

            self.cache.store().checkpoint(&snapshot).await?;

            let creating = plan.album_id.is_none();
            let album_id = batcher
                .ensure_album(&album.name, plan.album_id.clone(), &mut snapshot)
                .await?;

            let created_ids = batcher
                .upload_pending(&plan.pending_uploads, &mut snapshot)
                .await?;

            // Everything created for this album is durable before linking
            // starts; a crash past this point costs only the link phase.
            self.cache.store().checkpoint(&snapshot).await?;

            // An album that existed before this run with every file already
            // matched needs no linking; items in existing_media_ids already
            // satisfy membership. Skipping keeps an unchanged second run
            // free of remote mutations.
            let linked = if creating || !created_ids.is_empty() {
                let mut media_item_ids = plan.existing_media_ids;
                media_item_ids.extend(created_ids.iter().cloned());
                batcher.link_album(&album_id, &media_item_ids).await?
            } else {
                debug!(album = %album.name, "Album up to date, skipping link");
                0
            };

            stats.albums_processed += 1;
            stats.albums_created += usize::from(creating);
            stats.files_uploaded += created_ids.len();
            stats.media_linked += linked;
        }

        info!(
            "Run complete: {} albums processed, {} created, {} files uploaded, {} media linked",
            stats.albums_processed, stats.albums_created, stats.files_uploaded, stats.media_linked
        );

        Ok(stats)
    }
}
