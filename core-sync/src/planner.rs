//! Reconciliation: diff one local album against the catalog snapshot.

use core_catalog::CatalogSnapshot;

use crate::scanner::{LocalAlbum, LocalFile};

/// What must happen to bring one local album into the remote library.
///
/// Transient: built per album against the snapshot as it stands when the
/// album comes up for processing, applied, then discarded.
#[derive(Debug, Clone)]
pub struct UploadPlan {
    /// Remote album id, or `None` when the album must be created
    pub album_id: Option<String>,

    /// Ids of media items that already satisfy membership, in file order
    pub existing_media_ids: Vec<String>,

    /// Files with no remote counterpart, in file order
    pub pending_uploads: Vec<LocalFile>,
}

impl UploadPlan {
    /// True when applying the plan issues no mutation besides linking
    pub fn requires_upload(&self) -> bool {
        !self.pending_uploads.is_empty()
    }
}

/// Build the plan for `album` against `snapshot`.
///
/// Album resolution is exact title match; file resolution is exact match of
/// the transformed logical name against the snapshot's filename index. The
/// index lookup is the system's entire duplicate-prevention mechanism: it is
/// only as good as the assumption that remote filenames are unique and
/// stable, which is documented, not verified. A file renamed locally since
/// its upload will not match and is treated as a new upload.
pub fn reconcile(album: &LocalAlbum, snapshot: &CatalogSnapshot) -> UploadPlan {
    let album_id = snapshot.album_id_by_title(&album.name).map(String::from);

    let mut existing_media_ids = Vec::new();
    let mut pending_uploads = Vec::new();

    for file in &album.files {
        match snapshot.media_id_by_filename(&file.logical_name) {
            Some(id) => existing_media_ids.push(id.to_string()),
            None => pending_uploads.push(file.clone()),
        }
    }

    UploadPlan {
        album_id,
        existing_media_ids,
        pending_uploads,
    }
}
