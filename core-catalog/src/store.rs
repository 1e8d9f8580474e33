//! Durable snapshot checkpoints.
//!
//! Two plain JSON files, one per catalog, rewritten wholesale at every
//! checkpoint. The file pair is the unit of crash recovery: a re-run loads
//! whatever the last completed checkpoint wrote.

use bridge_traits::photos::{AlbumRecord, MediaItemRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::snapshot::CatalogSnapshot;

/// Media-item catalog file name
pub const MEDIA_ITEMS_FILE: &str = "media_items.json";

/// Album catalog file name
pub const ALBUMS_FILE: &str = "albums.json";

/// Whole-file JSON persistence for the two catalogs.
pub struct SnapshotStore {
    media_items_path: PathBuf,
    albums_path: PathBuf,
}

impl SnapshotStore {
    /// Store the catalog files under `dir` with their default names.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            media_items_path: dir.join(MEDIA_ITEMS_FILE),
            albums_path: dir.join(ALBUMS_FILE),
        }
    }

    /// Whether a persisted media-item catalog exists
    pub fn has_media_items(&self) -> bool {
        self.media_items_path.is_file()
    }

    /// Whether a persisted album catalog exists
    pub fn has_albums(&self) -> bool {
        self.albums_path.is_file()
    }

    /// Rewrite both catalog files from the snapshot.
    ///
    /// Called at album-processing boundaries; the write is a full overwrite,
    /// not an append.
    pub async fn checkpoint(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        debug!(
            media_items = snapshot.media_items().len(),
            albums = snapshot.albums().len(),
            "Checkpointing catalog snapshot"
        );
        self.write_file(&self.media_items_path, &snapshot.media_items())
            .await?;
        self.write_file(&self.albums_path, &snapshot.albums()).await
    }

    /// Load the persisted media-item catalog.
    pub async fn load_media_items(&self) -> Result<Vec<MediaItemRecord>> {
        self.read_file(&self.media_items_path).await
    }

    /// Load the persisted album catalog.
    pub async fn load_albums(&self) -> Result<Vec<AlbumRecord>> {
        self.read_file(&self.albums_path).await
    }

    async fn write_file<T: Serialize>(&self, path: &Path, records: &T) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(records).map_err(|e| CatalogError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CatalogError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn read_file<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| CatalogError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_slice(&raw).map_err(|e| CatalogError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> CatalogSnapshot {
        let mut album = AlbumRecord::new("a1", "2020-05");
        album.extra.insert(
            "productUrl".to_string(),
            serde_json::Value::String("https://photos.example/a1".to_string()),
        );
        CatalogSnapshot::from_parts(
            vec![MediaItemRecord {
                id: "m1".to_string(),
                filename: "2020-05_IMG1.jpg".to_string(),
            }],
            vec![album],
        )
    }

    #[tokio::test]
    async fn test_checkpoint_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        assert!(!store.has_media_items());
        assert!(!store.has_albums());

        store.checkpoint(&sample_snapshot()).await.unwrap();

        assert!(store.has_media_items());
        assert!(store.has_albums());

        let media_items = store.load_media_items().await.unwrap();
        let albums = store.load_albums().await.unwrap();
        assert_eq!(media_items.len(), 1);
        assert_eq!(media_items[0].filename, "2020-05_IMG1.jpg");
        assert_eq!(albums.len(), 1);
        assert!(albums[0].extra.contains_key("productUrl"));
    }

    #[tokio::test]
    async fn test_checkpoint_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.checkpoint(&sample_snapshot()).await.unwrap();

        let mut grown = sample_snapshot();
        grown.insert_media_item(MediaItemRecord {
            id: "m2".to_string(),
            filename: "2020-05_IMG2.jpg".to_string(),
        });
        store.checkpoint(&grown).await.unwrap();

        let media_items = store.load_media_items().await.unwrap();
        assert_eq!(media_items.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.load_media_items().await.unwrap_err();
        assert!(matches!(err, CatalogError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MEDIA_ITEMS_FILE), b"not json").unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.load_media_items().await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }
}
