//! In-memory catalog snapshot with lookup indices.

use bridge_traits::photos::{AlbumRecord, MediaItemRecord};
use std::collections::HashMap;

/// The pair of remote catalogs known to this run.
///
/// Both collections are append-only for the duration of a run: scanning
/// never removes entries, and successful album/media creations append the
/// records the service returned. The filename and title indices are kept in
/// step with every append.
///
/// Remote filenames are assumed unique. When the assumption is violated the
/// first record indexed for a filename wins and later records are reachable
/// only through the ordered collection, never through lookup. That mirrors
/// the documented duplicate-prevention behavior; it is not a conflict
/// resolution mechanism.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    media_items: Vec<MediaItemRecord>,
    albums: Vec<AlbumRecord>,
    media_index: HashMap<String, String>,
    album_index: HashMap<String, String>,
}

impl CatalogSnapshot {
    /// Build a snapshot from loaded or fetched catalogs, constructing both
    /// indices.
    pub fn from_parts(media_items: Vec<MediaItemRecord>, albums: Vec<AlbumRecord>) -> Self {
        let mut snapshot = Self {
            media_items: Vec::new(),
            albums: Vec::new(),
            media_index: HashMap::new(),
            album_index: HashMap::new(),
        };
        for item in media_items {
            snapshot.insert_media_item(item);
        }
        for album in albums {
            snapshot.insert_album(album);
        }
        snapshot
    }

    /// Ordered media-item catalog as persisted
    pub fn media_items(&self) -> &[MediaItemRecord] {
        &self.media_items
    }

    /// Ordered album catalog as persisted
    pub fn albums(&self) -> &[AlbumRecord] {
        &self.albums
    }

    /// O(1) media-item lookup by remote filename; first match wins
    pub fn media_id_by_filename(&self, filename: &str) -> Option<&str> {
        self.media_index.get(filename).map(String::as_str)
    }

    /// O(1) album lookup by exact title; first match wins
    pub fn album_id_by_title(&self, title: &str) -> Option<&str> {
        self.album_index.get(title).map(String::as_str)
    }

    /// Append a media item, indexing its filename unless already taken
    pub fn insert_media_item(&mut self, item: MediaItemRecord) {
        self.media_index
            .entry(item.filename.clone())
            .or_insert_with(|| item.id.clone());
        self.media_items.push(item);
    }

    /// Append an album, indexing its title unless already taken
    pub fn insert_album(&mut self, album: AlbumRecord) {
        self.album_index
            .entry(album.title.clone())
            .or_insert_with(|| album.id.clone());
        self.albums.push(album);
    }
}
