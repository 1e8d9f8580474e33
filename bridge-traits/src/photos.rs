//! Remote Photo Library Abstraction
//!
//! The surface of the remote photo-storage service as the sync core sees it:
//! paginated catalog listing, album creation, raw-byte uploads, and the two
//! size-bounded batch mutations. `provider-google-photos` implements this
//! trait against the Photos Library API; tests implement it with mocks.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Upper bound on items per batch mutation, imposed by the remote service.
///
/// Applies to both `batch_create_media_items` and `batch_add_to_album`.
pub const MAX_BATCH_SIZE: usize = 50;

/// A remote media item: an uploaded photo/video with a stable id.
///
/// `filename` is assumed unique across the whole remote catalog. That
/// assumption is load-bearing for duplicate prevention and is documented,
/// not verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemRecord {
    /// Stable remote identifier
    pub id: String,

    /// Remote filename, matched exactly against local logical names
    pub filename: String,
}

/// A remote album.
///
/// Only `id` and `title` are interpreted; everything else the service returns
/// is carried through `extra` untouched so persisted snapshots round-trip the
/// full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    /// Stable remote identifier
    pub id: String,

    /// Album title, matched exactly against local album names
    pub title: String,

    /// Opaque remote fields (product URLs, media counts, cover photo ids)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AlbumRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One page of the remote media-item catalog
#[derive(Debug, Clone)]
pub struct MediaItemPage {
    pub items: Vec<MediaItemRecord>,
    pub next_page_token: Option<String>,
}

/// One page of the remote album catalog
#[derive(Debug, Clone)]
pub struct AlbumPage {
    pub albums: Vec<AlbumRecord>,
    pub next_page_token: Option<String>,
}

/// An opaque reference to uploaded bytes.
///
/// A token is not yet a media item; it becomes one only when exchanged
/// through `batch_create_media_items`. The newtype keeps the two stages from
/// being confused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadToken(pub String);

impl UploadToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An uploaded blob waiting to be confirmed as a media item
#[derive(Debug, Clone)]
pub struct PendingMediaItem {
    pub upload_token: UploadToken,
    pub file_name: String,
}

/// Remote photo library operations
///
/// All operations are single-attempt: implementations must not retry, so a
/// transport or service failure aborts the caller's run immediately.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::photos::PhotoLibrary;
///
/// async fn first_page(library: &dyn PhotoLibrary) -> Result<usize> {
///     let page = library.list_media_items(None).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// List one page of the media-item catalog.
    ///
    /// Passing `None` requests the first page; the returned
    /// `next_page_token` is `None` on the final page.
    async fn list_media_items(&self, page_token: Option<String>) -> Result<MediaItemPage>;

    /// List one page of the album catalog.
    async fn list_albums(&self, page_token: Option<String>) -> Result<AlbumPage>;

    /// Create an album with the given title, returning the full record.
    async fn create_album(&self, title: &str) -> Result<AlbumRecord>;

    /// Upload raw bytes, obtaining an upload token.
    ///
    /// The token references an unconfirmed blob; the file becomes a media
    /// item only via `batch_create_media_items`.
    async fn upload_bytes(&self, file_name: &str, content: Bytes) -> Result<UploadToken>;

    /// Exchange up to [`MAX_BATCH_SIZE`] upload tokens for media items.
    ///
    /// The returned records are in result order; every entry corresponds to a
    /// successfully created item.
    async fn batch_create_media_items(
        &self,
        items: &[PendingMediaItem],
    ) -> Result<Vec<MediaItemRecord>>;

    /// Attach up to [`MAX_BATCH_SIZE`] media items to an album.
    async fn batch_add_to_album(&self, album_id: &str, media_item_ids: &[String]) -> Result<()>;
}
