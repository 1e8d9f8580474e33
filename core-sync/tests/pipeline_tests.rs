//! Integration tests for the full reconciliation pipeline
//!
//! These tests drive `SyncCoordinator` end to end against an in-memory
//! remote library and a real temporary directory tree, verifying:
//! - First-run behavior (album creation, uploads, linking)
//! - Idempotence (an unchanged second run performs zero remote mutations)
//! - Checkpoint durability across a mid-run failure
//! - Batch size bounds on every batched mutation

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::photos::{
    AlbumPage, AlbumRecord, MediaItemPage, MediaItemRecord, PendingMediaItem, PhotoLibrary,
    UploadToken, MAX_BATCH_SIZE,
};
use bytes::Bytes;
use core_catalog::{CatalogCache, RefreshPolicy, SnapshotStore};
use core_sync::{SyncConfig, SyncCoordinator, SyncError};
use std::path::Path;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

/// Remote mutation counters
#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    album_creates: usize,
    uploads: usize,
    batch_creates: usize,
    batch_adds: usize,
}

/// In-memory remote library tracking its own catalog state
struct MockPhotoService {
    media_items: Mutex<Vec<MediaItemRecord>>,
    albums: Mutex<Vec<AlbumRecord>>,
    counters: Mutex<Counters>,
    /// Upload of any logical name containing this substring fails
    fail_upload_containing: Option<String>,
}

impl MockPhotoService {
    fn new() -> Self {
        Self {
            media_items: Mutex::new(Vec::new()),
            albums: Mutex::new(Vec::new()),
            counters: Mutex::new(Counters::default()),
            fail_upload_containing: None,
        }
    }

    fn failing_uploads_containing(substring: &str) -> Self {
        Self {
            fail_upload_containing: Some(substring.to_string()),
            ..Self::new()
        }
    }

    fn counters(&self) -> Counters {
        *self.counters.lock().unwrap()
    }

    fn reset_counters(&self) {
        *self.counters.lock().unwrap() = Counters::default();
    }

    fn album_titles(&self) -> Vec<String> {
        self.albums
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.title.clone())
            .collect()
    }

    fn media_filenames(&self) -> Vec<String> {
        self.media_items
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.filename.clone())
            .collect()
    }
}

#[async_trait]
impl PhotoLibrary for MockPhotoService {
    async fn list_media_items(&self, page_token: Option<String>) -> BridgeResult<MediaItemPage> {
        assert!(page_token.is_none(), "mock serves a single page");
        Ok(MediaItemPage {
            items: self.media_items.lock().unwrap().clone(),
            next_page_token: None,
        })
    }

    async fn list_albums(&self, page_token: Option<String>) -> BridgeResult<AlbumPage> {
        assert!(page_token.is_none(), "mock serves a single page");
        Ok(AlbumPage {
            albums: self.albums.lock().unwrap().clone(),
            next_page_token: None,
        })
    }

    async fn create_album(&self, title: &str) -> BridgeResult<AlbumRecord> {
        self.counters.lock().unwrap().album_creates += 1;
        let album = AlbumRecord::new(format!("album-{}", title), title);
        self.albums.lock().unwrap().push(album.clone());
        Ok(album)
    }

    async fn upload_bytes(&self, file_name: &str, _content: Bytes) -> BridgeResult<UploadToken> {
        if let Some(needle) = &self.fail_upload_containing {
            if file_name.contains(needle.as_str()) {
                return Err(BridgeError::Network(format!(
                    "connection reset uploading {}",
                    file_name
                )));
            }
        }
        self.counters.lock().unwrap().uploads += 1;
        Ok(UploadToken(format!("token-{}", file_name)))
    }

    async fn batch_create_media_items(
        &self,
        items: &[PendingMediaItem],
    ) -> BridgeResult<Vec<MediaItemRecord>> {
        assert!(
            !items.is_empty() && items.len() <= MAX_BATCH_SIZE,
            "batch create size out of bounds: {}",
            items.len()
        );
        self.counters.lock().unwrap().batch_creates += 1;
        let created: Vec<MediaItemRecord> = items
            .iter()
            .map(|item| MediaItemRecord {
                id: format!("media-{}", item.file_name),
                filename: item.file_name.clone(),
            })
            .collect();
        self.media_items.lock().unwrap().extend(created.clone());
        Ok(created)
    }

    async fn batch_add_to_album(
        &self,
        _album_id: &str,
        media_item_ids: &[String],
    ) -> BridgeResult<()> {
        assert!(
            !media_item_ids.is_empty() && media_item_ids.len() <= MAX_BATCH_SIZE,
            "batch add size out of bounds: {}",
            media_item_ids.len()
        );
        self.counters.lock().unwrap().batch_adds += 1;
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"image-bytes").unwrap();
}

fn config(root: &Path) -> SyncConfig {
    SyncConfig {
        root: root.to_path_buf(),
        folder_prefix: None,
        monthly_albums: true,
        refresh: RefreshPolicy::default(),
    }
}

fn coordinator(service: Arc<MockPhotoService>, state_dir: &Path) -> SyncCoordinator {
    SyncCoordinator::new(
        service,
        CatalogCache::new(SnapshotStore::new(state_dir)),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_first_run_creates_uploads_and_links() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    touch(&local.path().join("2020-05/IMG1.jpg"));
    touch(&local.path().join("2020-05/IMG2.jpg"));
    touch(&local.path().join("2020-06/IMG3.jpg"));

    let service = Arc::new(MockPhotoService::new());
    let coordinator = coordinator(service.clone(), state.path());

    let stats = coordinator.run(&config(local.path())).await.unwrap();

    assert_eq!(stats.albums_processed, 2);
    assert_eq!(stats.albums_created, 2);
    assert_eq!(stats.files_uploaded, 3);
    assert_eq!(stats.media_linked, 3);

    let mut titles = service.album_titles();
    titles.sort();
    assert_eq!(titles, vec!["2020-05", "2020-06"]);

    let mut filenames = service.media_filenames();
    filenames.sort();
    assert_eq!(
        filenames,
        vec!["2020-05_IMG1.jpg", "2020-05_IMG2.jpg", "2020-06_IMG3.jpg"]
    );
}

#[tokio::test]
async fn test_second_run_performs_zero_remote_mutations() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    touch(&local.path().join("2020-05/IMG1.jpg"));
    touch(&local.path().join("2020-06/IMG2.jpg"));

    let service = Arc::new(MockPhotoService::new());
    let coordinator = coordinator(service.clone(), state.path());

    coordinator.run(&config(local.path())).await.unwrap();
    service.reset_counters();

    // Second run: snapshot loads from the checkpoint files, nothing local or
    // remote changed in between.
    let stats = coordinator.run(&config(local.path())).await.unwrap();

    let counters = service.counters();
    assert_eq!(counters.album_creates, 0);
    assert_eq!(counters.uploads, 0);
    assert_eq!(counters.batch_creates, 0);
    assert_eq!(counters.batch_adds, 0);

    assert_eq!(stats.albums_processed, 2);
    assert_eq!(stats.albums_created, 0);
    assert_eq!(stats.files_uploaded, 0);
    assert_eq!(stats.media_linked, 0);
}

#[tokio::test]
async fn test_existing_media_is_linked_into_new_album_without_upload() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    touch(&local.path().join("2020-05/IMG1.jpg"));

    let service = Arc::new(MockPhotoService::new());
    // The media item already exists remotely under its logical name, but the
    // album does not.
    service.media_items.lock().unwrap().push(MediaItemRecord {
        id: "media-existing".to_string(),
        filename: "2020-05_IMG1.jpg".to_string(),
    });

    let coordinator = coordinator(service.clone(), state.path());
    let stats = coordinator.run(&config(local.path())).await.unwrap();

    assert_eq!(stats.albums_created, 1);
    assert_eq!(stats.files_uploaded, 0);
    assert_eq!(stats.media_linked, 1);

    let counters = service.counters();
    assert_eq!(counters.uploads, 0);
    assert_eq!(counters.batch_adds, 1);
}

#[tokio::test]
async fn test_checkpoint_durability_across_mid_run_failure() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    touch(&local.path().join("2020-05/IMG1.jpg"));
    touch(&local.path().join("2020-06/IMG2.jpg"));

    // Album 2020-06 dies mid-upload, after 2020-05 completed.
    let service = Arc::new(MockPhotoService::failing_uploads_containing("2020-06"));
    let coordinator = coordinator(service.clone(), state.path());

    let err = coordinator.run(&config(local.path())).await.unwrap_err();
    assert!(matches!(err, SyncError::Remote(_)));

    // The persisted snapshot holds everything album 2020-05 committed and
    // nothing of 2020-06's in-flight work.
    let store = SnapshotStore::new(state.path());
    let media_items = store.load_media_items().await.unwrap();
    let albums = store.load_albums().await.unwrap();

    assert_eq!(media_items.len(), 1);
    assert_eq!(media_items[0].filename, "2020-05_IMG1.jpg");
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].title, "2020-05");
}

#[tokio::test]
async fn test_large_album_respects_batch_bounds() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    for i in 0..120 {
        touch(&local.path().join(format!("2020-05/IMG{:03}.jpg", i)));
    }

    // The mock asserts 1..=MAX_BATCH_SIZE on every batched call.
    let service = Arc::new(MockPhotoService::new());
    let coordinator = coordinator(service.clone(), state.path());

    let stats = coordinator.run(&config(local.path())).await.unwrap();

    assert_eq!(stats.files_uploaded, 120);
    assert_eq!(stats.media_linked, 120);

    let counters = service.counters();
    assert_eq!(counters.batch_creates, 3);
    assert_eq!(counters.batch_adds, 3);
}

#[tokio::test]
async fn test_rerun_after_failure_resumes_without_reupload() {
    let local = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    touch(&local.path().join("2020-05/IMG1.jpg"));
    touch(&local.path().join("2020-06/IMG2.jpg"));

    let failing = Arc::new(MockPhotoService::failing_uploads_containing("2020-06"));
    coordinator(failing.clone(), state.path())
        .run(&config(local.path()))
        .await
        .unwrap_err();

    // Re-run against a healthy service carrying over the remote state the
    // failed run committed.
    let healthy = Arc::new(MockPhotoService::new());
    *healthy.media_items.lock().unwrap() = failing.media_items.lock().unwrap().clone();
    *healthy.albums.lock().unwrap() = failing.albums.lock().unwrap().clone();

    let stats = coordinator(healthy.clone(), state.path())
        .run(&config(local.path()))
        .await
        .unwrap();

    // Album 2020-05 was behind a checkpoint: nothing of it is redone. Only
    // the in-flight album's work repeats.
    let counters = healthy.counters();
    assert_eq!(counters.uploads, 1);
    assert_eq!(stats.files_uploaded, 1);
    assert_eq!(stats.media_linked, 1);
}
