//! Google Photos API connector implementation
//!
//! Implements the `PhotoLibrary` trait for the Photos Library API v1.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::photos::{
    AlbumPage, AlbumRecord, MediaItemPage, MediaItemRecord, PendingMediaItem, PhotoLibrary,
    UploadToken,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use core_auth::AuthProvider;

use crate::error::GooglePhotosError;
use crate::types::{
    AlbumsListResponse, BatchAddRequest, BatchCreateRequest, CreateAlbumRequest,
    MediaItemsListResponse, NewAlbum, NewMediaItem, SimpleMediaItem,
};

/// Photos Library API base URL
const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com/v1";

/// Raw-byte upload endpoint
const UPLOAD_URL: &str = "https://photoslibrary.googleapis.com/v1/uploads";

/// Page size for mediaItems.list
const MEDIA_ITEMS_PAGE_SIZE: u32 = 100;

/// Page size for albums.list
const ALBUMS_PAGE_SIZE: u32 = 50;

/// Google Photos API connector
///
/// Implements `PhotoLibrary` for the Photos Library API v1.
///
/// # Authentication
///
/// A valid credential is requested from the injected [`AuthProvider`] before
/// every call; if the provider reports the token expired, the connector asks
/// for one refresh and re-requests the credential. No shared client state is
/// mutated in place.
///
/// # Example
///
/// ```ignore
/// use provider_google_photos::PhotosConnector;
/// use bridge_traits::photos::PhotoLibrary;
///
/// let connector = PhotosConnector::new(http_client, auth_provider);
/// let page = connector.list_albums(None).await?;
/// ```
pub struct PhotosConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Credential source
    auth: Arc<dyn AuthProvider>,
}

impl PhotosConnector {
    /// Create a new Google Photos connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `auth` - Credential source with `photoslibrary` scope
    pub fn new(http_client: Arc<dyn HttpClient>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { http_client, auth }
    }

    /// Obtain a usable access token, refreshing once if the stored one
    /// has expired.
    async fn access_token(&self) -> std::result::Result<String, GooglePhotosError> {
        let credential = self.auth.valid_credential().await?;
        if !credential.expired {
            return Ok(credential.access_token);
        }

        debug!("Stored credential expired, refreshing");
        self.auth.refresh().await?;
        let credential = self.auth.valid_credential().await?;
        Ok(credential.access_token)
    }

    /// Execute a request with bearer auth, mapping non-2xx statuses to
    /// API errors.
    async fn execute(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, GooglePhotosError> {
        let token = self.access_token().await?;
        let request = request.bearer_token(token);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(GooglePhotosError::BridgeError)?;

        if !response.is_success() {
            return Err(GooglePhotosError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        what: &str,
    ) -> std::result::Result<T, GooglePhotosError> {
        let response = self
            .execute(HttpRequest::new(HttpMethod::Get, url).header("Accept", "application/json"))
            .await?;

        serde_json::from_slice(&response.body)
            .map_err(|e| GooglePhotosError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: &B,
        what: &str,
    ) -> std::result::Result<T, GooglePhotosError> {
        let request = HttpRequest::new(HttpMethod::Post, url)
            .json(body)
            .map_err(GooglePhotosError::BridgeError)?;

        let response = self.execute(request).await?;

        serde_json::from_slice(&response.body)
            .map_err(|e| GooglePhotosError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }
}

#[async_trait]
impl PhotoLibrary for PhotosConnector {
    #[instrument(skip(self))]
    async fn list_media_items(&self, page_token: Option<String>) -> Result<MediaItemPage> {
        let mut url = format!(
            "{}/mediaItems?pageSize={}",
            PHOTOS_API_BASE, MEDIA_ITEMS_PAGE_SIZE
        );
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(&token)));
        }

        let list_response: MediaItemsListResponse =
            self.get_json(url, "media items list response").await?;

        debug!(
            "Listed {} media items from Google Photos",
            list_response.media_items.len()
        );

        Ok(MediaItemPage {
            items: list_response
                .media_items
                .into_iter()
                .map(|item| MediaItemRecord {
                    id: item.id,
                    filename: item.filename,
                })
                .collect(),
            next_page_token: list_response.next_page_token,
        })
    }

    #[instrument(skip(self))]
    async fn list_albums(&self, page_token: Option<String>) -> Result<AlbumPage> {
        let mut url = format!("{}/albums?pageSize={}", PHOTOS_API_BASE, ALBUMS_PAGE_SIZE);
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(&token)));
        }

        let list_response: AlbumsListResponse = self.get_json(url, "albums list response").await?;

        debug!(
            "Listed {} albums from Google Photos",
            list_response.albums.len()
        );

        Ok(AlbumPage {
            albums: list_response.albums,
            next_page_token: list_response.next_page_token,
        })
    }

    #[instrument(skip(self), fields(title = %title))]
    async fn create_album(&self, title: &str) -> Result<AlbumRecord> {
        info!("Creating Google Photos album");

        let body = CreateAlbumRequest {
            album: NewAlbum {
                title: title.to_string(),
            },
        };

        let album: AlbumRecord = self
            .post_json(
                format!("{}/albums", PHOTOS_API_BASE),
                &body,
                "album create response",
            )
            .await?;

        Ok(album)
    }

    #[instrument(skip(self, content), fields(file_name = %file_name, bytes = content.len()))]
    async fn upload_bytes(&self, file_name: &str, content: Bytes) -> Result<UploadToken> {
        let request = HttpRequest::new(HttpMethod::Post, UPLOAD_URL)
            .header("Content-Type", "application/octet-stream")
            .header("X-Goog-Upload-File-Name", file_name)
            .header("X-Goog-Upload-Protocol", "raw")
            .body(content);

        let response = self.execute(request).await?;

        let token = response
            .text()
            .map_err(|e| GooglePhotosError::ParseError(format!("upload token: {}", e)))?;

        if token.is_empty() {
            return Err(
                GooglePhotosError::MalformedResponse("empty upload token".to_string()).into(),
            );
        }

        info!("Uploaded {}", file_name);

        Ok(UploadToken(token))
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn batch_create_media_items(
        &self,
        items: &[PendingMediaItem],
    ) -> Result<Vec<MediaItemRecord>> {
        info!("Creating {} media items in Google Photos", items.len());

        let body = BatchCreateRequest {
            new_media_items: items
                .iter()
                .map(|item| NewMediaItem {
                    simple_media_item: SimpleMediaItem {
                        upload_token: item.upload_token.as_str().to_string(),
                        file_name: item.file_name.clone(),
                    },
                })
                .collect(),
        };

        let response: crate::types::BatchCreateResponse = self
            .post_json(
                format!("{}/mediaItems:batchCreate", PHOTOS_API_BASE),
                &body,
                "batch create response",
            )
            .await?;

        let mut created = Vec::with_capacity(response.new_media_item_results.len());
        for result in response.new_media_item_results {
            let media_item = result.media_item.ok_or_else(|| {
                GooglePhotosError::MalformedResponse(
                    "batch-create result without media item".to_string(),
                )
            })?;
            created.push(MediaItemRecord {
                id: media_item.id,
                filename: media_item.filename,
            });
        }

        Ok(created)
    }

    #[instrument(skip(self, media_item_ids), fields(album_id = %album_id, count = media_item_ids.len()))]
    async fn batch_add_to_album(&self, album_id: &str, media_item_ids: &[String]) -> Result<()> {
        debug!("Adding {} media items to album", media_item_ids.len());

        let body = BatchAddRequest {
            media_item_ids: media_item_ids.to_vec(),
        };

        let _: serde_json::Value = self
            .post_json(
                format!(
                    "{}/albums/{}:batchAddMediaItems",
                    PHOTOS_API_BASE,
                    urlencoding::encode(album_id)
                ),
                &body,
                "batch add response",
            )
            .await?;

        Ok(())
    }
}
