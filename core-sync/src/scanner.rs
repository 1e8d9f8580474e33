//! Local album discovery.
//!
//! Walks the local tree, keeps only known photo/video files, and groups
//! directories into logical albums. Grouping decisions use the same
//! substring semantics the tool has always had; the predicates are named and
//! exported so tests can pin that behavior down directly.

use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

/// Closed set of recognized photo extensions
const PHOTO_EXTENSIONS: &[&str] = &[
    "AVIF", "BMP", "GIF", "HEIC", "ICO", "JPG", "JPEG", "PNG", "TIFF", "WEBP",
];

/// Closed set of recognized video extensions
const VIDEO_EXTENSIONS: &[&str] = &[
    "3GP", "3G2", "ASF", "AVI", "DIVX", "M2T", "M2TS", "M4V", "MKV", "MMV", "MOD", "MOV", "MP4",
    "MPG", "MTS", "TOD", "WMV",
];

/// Album-qualified local file.
///
/// `logical_name` is the original file name prefixed with its album name,
/// which is what makes local files globally unique against the remote
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub logical_name: String,
    pub path: PathBuf,
}

/// A logical album: a name plus its files in discovery order.
///
/// Built fresh on every scan and discarded with the run; never persisted.
#[derive(Debug, Clone)]
pub struct LocalAlbum {
    pub name: String,
    pub files: Vec<LocalFile>,
}

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the local album tree
    pub root: PathBuf,

    /// Substring prefix filter on directory paths; `None` matches everything
    pub folder_prefix: Option<String>,

    /// Group files under the nearest `YYYY-M[M]` ancestor directory instead
    /// of their immediate parent
    pub monthly_albums: bool,
}

/// Substring prefix filter on a directory path.
///
/// A directory passes when its path contains `<root>/<prefix>` anywhere.
/// This is deliberately not component-bounded: prefix `2004` admits
/// `2004-03` and also `2004x`. An empty prefix matches every directory,
/// including the root itself.
pub fn path_matches_prefix(root: &Path, prefix: &str, dir: &Path) -> bool {
    if prefix.is_empty() {
        return true;
    }
    let needle = format!("{}/{}", root.display(), prefix);
    dir.to_string_lossy().contains(&needle)
}

/// Whether a directory belongs to an already-discovered album.
///
/// True when the album name appears anywhere in the directory path, so
/// subdirectories nested at any depth under an album fold into it.
pub fn folds_into_album(album_name: &str, dir: &Path) -> bool {
    dir.to_string_lossy().contains(album_name)
}

/// Case-insensitive extension check against the closed photo/video sets.
///
/// The extension is whatever follows the final `.`; a name without a dot is
/// compared whole.
pub fn is_media_file(file_name: &str) -> bool {
    let extension = file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_ascii_uppercase();
    PHOTO_EXTENSIONS.contains(&extension.as_str()) || VIDEO_EXTENSIONS.contains(&extension.as_str())
}

/// Walks a root directory and produces logical albums.
pub struct LocalAlbumScanner {
    config: ScanConfig,
    monthly_pattern: Regex,
}

impl LocalAlbumScanner {
    pub fn new(config: ScanConfig) -> Self {
        let monthly_pattern =
            Regex::new(r"^\d{4}-\d{1,2}").expect("monthly album pattern must compile");
        Self {
            config,
            monthly_pattern,
        }
    }

    /// Scan the configured root.
    ///
    /// Directories are visited parent-first with sorted entries, so album
    /// order and per-album file order are deterministic. Directories with no
    /// recognized media files produce no album. Any unreadable directory or
    /// file aborts the scan.
    pub fn scan(&self) -> Result<Vec<LocalAlbum>> {
        let mut directories: Vec<PathBuf> = Vec::new();
        let mut files_by_dir: HashMap<PathBuf, Vec<String>> = HashMap::new();

        for entry in WalkDir::new(&self.config.root).sort_by_file_name() {
            let entry = entry.map_err(|e| SyncError::LocalIo {
                path: e
                    .path()
                    .unwrap_or(self.config.root.as_path())
                    .display()
                    .to_string(),
                reason: e.to_string(),
            })?;

            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            } else if entry.file_type().is_file() {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                let parent = entry
                    .path()
                    .parent()
                    .unwrap_or(self.config.root.as_path())
                    .to_path_buf();
                files_by_dir.entry(parent).or_default().push(file_name);
            }
        }

        let prefix = self.config.folder_prefix.as_deref().unwrap_or("");
        let mut albums: Vec<LocalAlbum> = Vec::new();

        for dir in directories {
            if !path_matches_prefix(&self.config.root, prefix, &dir) {
                continue;
            }

            let media_files: Vec<String> = files_by_dir
                .remove(&dir)
                .unwrap_or_default()
                .into_iter()
                .filter(|name| is_media_file(name))
                .collect();

            // Not a directory containing media items, nothing to add
            if media_files.is_empty() {
                continue;
            }

            let album_name = self.resolve_album_name(&dir, &albums);
            debug!(directory = %dir.display(), album = %album_name, files = media_files.len(), "Scanned album directory");

            let index = match albums.iter().position(|a| a.name == album_name) {
                Some(index) => index,
                None => {
                    albums.push(LocalAlbum {
                        name: album_name.clone(),
                        files: Vec::new(),
                    });
                    albums.len() - 1
                }
            };

            for file_name in media_files {
                albums[index].files.push(LocalFile {
                    logical_name: format!("{}_{}", album_name, file_name),
                    path: dir.join(&file_name),
                });
            }
        }

        Ok(albums)
    }

    /// Pick the album a directory's files belong to.
    ///
    /// An already-discovered album whose name appears in the path wins.
    /// Otherwise the monthly policy walks the components leaf-to-root for
    /// the first `YYYY-M[M]` match, falling back to the leaf name when no
    /// ancestor matches (and always using the leaf when the policy is off).
    fn resolve_album_name(&self, dir: &Path, known: &[LocalAlbum]) -> String {
        if let Some(album) = known.iter().find(|a| folds_into_album(&a.name, dir)) {
            return album.name.clone();
        }

        if self.config.monthly_albums {
            for component in dir.components().rev() {
                if let Component::Normal(name) = component {
                    let name = name.to_string_lossy();
                    if self.monthly_pattern.is_match(&name) {
                        return name.into_owned();
                    }
                }
            }
        }

        leaf_name(dir)
    }
}

fn leaf_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
