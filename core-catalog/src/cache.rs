//! Snapshot acquisition: persisted files or a fresh paginated fetch.

use bridge_traits::photos::{AlbumRecord, MediaItemRecord, PhotoLibrary};
use tracing::{debug, info};

use crate::error::Result;
use crate::snapshot::CatalogSnapshot;
use crate::store::SnapshotStore;

/// Which catalogs to re-download instead of loading from disk.
///
/// A catalog whose persisted file is missing is fetched regardless of its
/// flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshPolicy {
    pub media_items: bool,
    pub albums: bool,
}

/// Produces the run's [`CatalogSnapshot`].
pub struct CatalogCache {
    store: SnapshotStore,
}

impl CatalogCache {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Obtain a snapshot, fetching each catalog that is missing or flagged
    /// for refresh and loading the rest from the persisted files.
    ///
    /// Freshly fetched catalogs are checkpointed immediately so an aborted
    /// run does not pay for the listing again.
    ///
    /// A failed page request fails the whole fetch; there is no retry.
    pub async fn obtain(
        &self,
        library: &dyn PhotoLibrary,
        refresh: RefreshPolicy,
    ) -> Result<CatalogSnapshot> {
        let mut fetched = false;

        let media_items = if refresh.media_items || !self.store.has_media_items() {
            info!("Downloading media items from Google Photos");
            fetched = true;
            fetch_all_media_items(library).await?
        } else {
            info!("Loading media items from local file");
            self.store.load_media_items().await?
        };

        let albums = if refresh.albums || !self.store.has_albums() {
            info!("Downloading albums from Google Photos");
            fetched = true;
            fetch_all_albums(library).await?
        } else {
            info!("Loading albums from local file");
            self.store.load_albums().await?
        };

        let snapshot = CatalogSnapshot::from_parts(media_items, albums);

        if fetched {
            self.store.checkpoint(&snapshot).await?;
        }

        Ok(snapshot)
    }
}

/// Accumulate every page of the media-item catalog.
async fn fetch_all_media_items(library: &dyn PhotoLibrary) -> Result<Vec<MediaItemRecord>> {
    let mut media_items = Vec::new();
    let mut page_token = None;
    loop {
        let page = library.list_media_items(page_token).await?;
        debug!("Got media items from Google Photos: {}", page.items.len());
        media_items.extend(page.items);
        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }
    Ok(media_items)
}

/// Accumulate every page of the album catalog.
async fn fetch_all_albums(library: &dyn PhotoLibrary) -> Result<Vec<AlbumRecord>> {
    let mut albums = Vec::new();
    let mut page_token = None;
    loop {
        let page = library.list_albums(page_token).await?;
        debug!("Got albums from Google Photos: {}", page.albums.len());
        albums.extend(page.albums);
        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }
    Ok(albums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::photos::{AlbumPage, MediaItemPage, PendingMediaItem, UploadToken};
    use bytes::Bytes;
    use mockall::mock;

    mock! {
        Library {}

        #[async_trait]
        impl PhotoLibrary for Library {
            async fn list_media_items(&self, page_token: Option<String>) -> BridgeResult<MediaItemPage>;
            async fn list_albums(&self, page_token: Option<String>) -> BridgeResult<AlbumPage>;
            async fn create_album(&self, title: &str) -> BridgeResult<AlbumRecord>;
            async fn upload_bytes(&self, file_name: &str, content: Bytes) -> BridgeResult<UploadToken>;
            async fn batch_create_media_items(&self, items: &[PendingMediaItem]) -> BridgeResult<Vec<MediaItemRecord>>;
            async fn batch_add_to_album(&self, album_id: &str, media_item_ids: &[String]) -> BridgeResult<()>;
        }
    }

    fn media(id: &str, filename: &str) -> MediaItemRecord {
        MediaItemRecord {
            id: id.to_string(),
            filename: filename.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_follows_continuation_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(SnapshotStore::new(dir.path()));

        let mut library = MockLibrary::new();
        library
            .expect_list_media_items()
            .times(2)
            .returning(|page_token| match page_token {
                None => Ok(MediaItemPage {
                    items: vec![media("m1", "a_1.jpg")],
                    next_page_token: Some("p2".to_string()),
                }),
                Some(token) => {
                    assert_eq!(token, "p2");
                    Ok(MediaItemPage {
                        items: vec![media("m2", "a_2.jpg")],
                        next_page_token: None,
                    })
                }
            });
        library.expect_list_albums().times(1).returning(|_| {
            Ok(AlbumPage {
                albums: vec![AlbumRecord::new("a1", "a")],
                next_page_token: None,
            })
        });

        let snapshot = cache
            .obtain(&library, RefreshPolicy::default())
            .await
            .unwrap();

        assert_eq!(snapshot.media_items().len(), 2);
        assert_eq!(snapshot.album_id_by_title("a"), Some("a1"));

        // The fetched catalogs were checkpointed
        assert!(cache.store().has_media_items());
        assert!(cache.store().has_albums());
    }

    #[tokio::test]
    async fn test_persisted_catalogs_skip_the_remote() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let seeded = CatalogSnapshot::from_parts(
            vec![media("m1", "a_1.jpg")],
            vec![AlbumRecord::new("a1", "a")],
        );
        store.checkpoint(&seeded).await.unwrap();

        let cache = CatalogCache::new(store);
        let library = MockLibrary::new(); // any remote call would panic

        let snapshot = cache
            .obtain(&library, RefreshPolicy::default())
            .await
            .unwrap();

        assert_eq!(snapshot.media_id_by_filename("a_1.jpg"), Some("m1"));
    }

    #[tokio::test]
    async fn test_refresh_flag_forces_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .checkpoint(&CatalogSnapshot::from_parts(
                vec![media("stale", "stale.jpg")],
                vec![],
            ))
            .await
            .unwrap();

        let cache = CatalogCache::new(store);

        let mut library = MockLibrary::new();
        library.expect_list_media_items().times(1).returning(|_| {
            Ok(MediaItemPage {
                items: vec![media("fresh", "fresh.jpg")],
                next_page_token: None,
            })
        });

        let snapshot = cache
            .obtain(
                &library,
                RefreshPolicy {
                    media_items: true,
                    albums: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(snapshot.media_id_by_filename("fresh.jpg"), Some("fresh"));
        assert_eq!(snapshot.media_id_by_filename("stale.jpg"), None);
    }

    #[tokio::test]
    async fn test_failed_page_fails_the_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(SnapshotStore::new(dir.path()));

        let mut library = MockLibrary::new();
        library
            .expect_list_media_items()
            .times(1)
            .returning(|_| Err(BridgeError::Network("connection reset".to_string())));

        let result = cache.obtain(&library, RefreshPolicy::default()).await;
        assert!(result.is_err());
    }
}
