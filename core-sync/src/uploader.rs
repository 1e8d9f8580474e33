//! Plan application: uploads, batched creation, batched linking.
//!
//! Per local file the progression is strictly forward:
//! unmatched, upload requested, token obtained, media item created, linked
//! to album. There is no backward transition; a failure at any step aborts
//! the run and the next run redoes the in-flight album against the reloaded
//! snapshot.

use bridge_traits::photos::{PendingMediaItem, PhotoLibrary, MAX_BATCH_SIZE};
use bytes::Bytes;
use core_catalog::CatalogSnapshot;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::scanner::LocalFile;

/// Executes the mutations an [`UploadPlan`](crate::planner::UploadPlan)
/// calls for.
///
/// Every snapshot change is made through the `&mut CatalogSnapshot`
/// parameter the caller passes in, never through shared state, so the
/// coordinator decides exactly when the mutated snapshot reaches disk.
pub struct UploadBatcher {
    library: Arc<dyn PhotoLibrary>,
}

impl UploadBatcher {
    pub fn new(library: Arc<dyn PhotoLibrary>) -> Self {
        Self { library }
    }

    /// Resolve the album id, creating the album when the plan has none.
    ///
    /// The created record is appended to the snapshot immediately, which is
    /// what guarantees the album is created at most once per run: every
    /// later plan resolves the title against the updated index.
    pub async fn ensure_album(
        &self,
        name: &str,
        planned_id: Option<String>,
        snapshot: &mut CatalogSnapshot,
    ) -> Result<String> {
        if let Some(id) = planned_id {
            return Ok(id);
        }

        info!("Creating Google Photos album {}", name);
        let album = self.library.create_album(name).await?;
        let id = album.id.clone();
        snapshot.insert_album(album);
        Ok(id)
    }

    /// Upload every pending file in order and exchange the tokens for media
    /// items in batches of at most [`MAX_BATCH_SIZE`].
    ///
    /// Each created record is appended to the snapshot as soon as the
    /// service confirms it. Returns the new media-item ids in creation
    /// order.
    pub async fn upload_pending(
        &self,
        pending: &[LocalFile],
        snapshot: &mut CatalogSnapshot,
    ) -> Result<Vec<String>> {
        let mut uploads = Vec::with_capacity(pending.len());
        for file in pending {
            let content = tokio::fs::read(&file.path)
                .await
                .map_err(|e| SyncError::LocalIo {
                    path: file.path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let upload_token = self
                .library
                .upload_bytes(&file.logical_name, Bytes::from(content))
                .await?;

            uploads.push(PendingMediaItem {
                upload_token,
                file_name: file.logical_name.clone(),
            });
        }

        let mut created_ids = Vec::with_capacity(uploads.len());
        for batch in uploads.chunks(MAX_BATCH_SIZE) {
            info!("Adding {} media items to Google Photos", batch.len());
            let created = self.library.batch_create_media_items(batch).await?;
            for record in created {
                created_ids.push(record.id.clone());
                snapshot.insert_media_item(record);
            }
        }

        Ok(created_ids)
    }

    /// Attach the combined id set to the album in batches of at most
    /// [`MAX_BATCH_SIZE`], dropping duplicate ids first.
    ///
    /// Returns how many distinct items were linked.
    pub async fn link_album(&self, album_id: &str, media_item_ids: &[String]) -> Result<usize> {
        let unique = dedupe_preserving_order(media_item_ids);
        debug!(
            "Adding {} media items to Google Photos album {}",
            unique.len(),
            album_id
        );

        for batch in unique.chunks(MAX_BATCH_SIZE) {
            self.library.batch_add_to_album(album_id, batch).await?;
        }

        Ok(unique.len())
    }
}

/// Order-preserving dedup; the first occurrence of an id wins.
fn dedupe_preserving_order(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
