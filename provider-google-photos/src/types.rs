//! Google Photos API request/response types
//!
//! Data structures for the Photos Library API v1 wire format.

use bridge_traits::photos::AlbumRecord;
use serde::{Deserialize, Serialize};

/// Photos Library API media item resource (the fields the sync consumes)
///
/// See: https://developers.google.com/photos/library/reference/rest/v1/mediaItems
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaItem {
    /// Media item ID
    pub id: String,

    /// Remote filename
    pub filename: String,
}

/// mediaItems.list response
///
/// `mediaItems` is absent (not empty) when a page has no items.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsListResponse {
    #[serde(default)]
    pub media_items: Vec<ApiMediaItem>,

    /// Token for next page; absent on the final page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// albums.list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumsListResponse {
    #[serde(default)]
    pub albums: Vec<AlbumRecord>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// albums.create request body
#[derive(Debug, Serialize)]
pub struct CreateAlbumRequest {
    pub album: NewAlbum,
}

#[derive(Debug, Serialize)]
pub struct NewAlbum {
    pub title: String,
}

/// mediaItems.batchCreate request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateRequest {
    pub new_media_items: Vec<NewMediaItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub simple_media_item: SimpleMediaItem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMediaItem {
    pub upload_token: String,
    pub file_name: String,
}

/// mediaItems.batchCreate response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResponse {
    #[serde(default)]
    pub new_media_item_results: Vec<NewMediaItemResult>,
}

/// One result of a batch create.
///
/// `mediaItem` is present only when creation succeeded; the pipeline treats
/// its absence as a malformed response and aborts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemResult {
    #[serde(default)]
    pub media_item: Option<ApiMediaItem>,
}

/// albums.batchAddMediaItems request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAddRequest {
    pub media_item_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_media_items_list_response() {
        let json = r#"{
            "mediaItems": [
                {"id": "m1", "filename": "2020-05_IMG1.jpg", "mimeType": "image/jpeg"}
            ],
            "nextPageToken": "token123"
        }"#;

        let response: MediaItemsListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.media_items.len(), 1);
        assert_eq!(response.media_items[0].filename, "2020-05_IMG1.jpg");
        assert_eq!(response.next_page_token, Some("token123".to_string()));
    }

    #[test]
    fn test_deserialize_list_response_without_items() {
        // Final empty page: no mediaItems key and no continuation token
        let response: MediaItemsListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.media_items.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_deserialize_albums_list_response() {
        let json = r#"{
            "albums": [
                {"id": "a1", "title": "2020-05", "productUrl": "https://photos.example/a1"}
            ]
        }"#;

        let response: AlbumsListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.albums.len(), 1);
        assert_eq!(response.albums[0].title, "2020-05");
        assert!(response.albums[0].extra.contains_key("productUrl"));
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_serialize_batch_create_request() {
        let request = BatchCreateRequest {
            new_media_items: vec![NewMediaItem {
                simple_media_item: SimpleMediaItem {
                    upload_token: "upload-token".to_string(),
                    file_name: "2020-05_IMG1.jpg".to_string(),
                },
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["newMediaItems"][0]["simpleMediaItem"]["uploadToken"],
            "upload-token"
        );
        assert_eq!(
            value["newMediaItems"][0]["simpleMediaItem"]["fileName"],
            "2020-05_IMG1.jpg"
        );
    }

    #[test]
    fn test_deserialize_batch_create_result_without_media_item() {
        let json = r#"{
            "newMediaItemResults": [
                {"status": {"message": "Internal error"}}
            ]
        }"#;

        let response: BatchCreateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.new_media_item_results.len(), 1);
        assert!(response.new_media_item_results[0].media_item.is_none());
    }
}
