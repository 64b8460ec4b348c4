//! Overlay folder listings.
//!
//! An overlay catalog is a directory of raster files served next to the
//! globe. Listings can come from scanning a local directory, from a remote
//! listing endpoint, or from a static `manifest.json` fallback when no
//! endpoint is available. All three produce the same [`Listing`] shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File extensions served as overlays, in lowercase with the leading dot.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".tif", ".tiff", ".webp"];

/// One overlay file in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// 1-based position within the listing.
    pub id: u32,
    /// File stem without the extension.
    pub name: String,
    /// Full file name.
    pub file: String,
    /// Path the file is served under.
    pub path: String,
    /// Size in whole kilobytes.
    pub size: u64,
    /// Lowercase extension with the leading dot.
    pub extension: String,
}

/// A folder listing, in the shape the listing endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Whether the listing succeeded. Always `true` on this side; carried
    /// for wire compatibility.
    pub success: bool,
    /// The folder that was listed.
    pub folder: String,
    /// The overlay files, sorted by file name.
    pub files: Vec<ListingEntry>,
    /// Number of entries in `files`.
    pub count: usize,
}

impl Listing {
    /// Parse a static `manifest.json`, accepting either the full listing
    /// shape or a bare array of file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid JSON in either shape.
    pub fn from_manifest_json(folder: &str, bytes: &[u8]) -> Result<Self> {
        if let Ok(listing) = serde_json::from_slice::<Self>(bytes) {
            return Ok(listing);
        }

        let names: Vec<String> =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidData {
                context: "overlay manifest",
                detail: e.to_string(),
            })?;

        let files = names
            .iter()
            .filter(|name| supported_extension(name).is_some())
            .enumerate()
            .map(|(idx, name)| entry_for(folder, idx, name, 0))
            .collect::<Vec<_>>();

        Ok(Self {
            success: true,
            folder: folder.to_string(),
            count: files.len(),
            files,
        })
    }
}

/// The supported extension of a file name, if it has one.
#[must_use]
pub fn supported_extension(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .copied()
}

fn entry_for(folder: &str, idx: usize, file_name: &str, size_kb: u64) -> ListingEntry {
    // Extension is checked before this is called.
    let extension = supported_extension(file_name).unwrap_or_default();
    let name = file_name
        .strip_suffix(extension)
        .unwrap_or(file_name)
        .to_string();
    ListingEntry {
        id: u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1,
        name,
        file: file_name.to_string(),
        path: format!("/{folder}/{file_name}"),
        size: size_kb,
        extension: extension.to_string(),
    }
}

/// List the overlay files in `folder` under `root`.
///
/// Entries are sorted by file name and sizes reported in whole kilobytes.
/// Unsupported extensions and subdirectories are skipped.
///
/// # Errors
///
/// Rejects folder names containing parent traversal or path separators,
/// folders that resolve outside `root`, and paths that are missing or not a
/// directory.
pub fn list_folder(root: &Path, folder: &str) -> Result<Listing> {
    if folder.contains("..") || folder.contains('/') || folder.contains('\\') {
        return Err(Error::InvalidPath {
            path: folder.to_string(),
            reason: "folder name must be a single path component",
        });
    }

    let dir = root.join(folder);
    if !dir.exists() {
        return Err(Error::ResourceNotFound {
            path: dir.display().to_string(),
        });
    }
    if !dir.is_dir() {
        return Err(Error::InvalidPath {
            path: dir.display().to_string(),
            reason: "not a directory",
        });
    }

    // Symlinks could still escape the root; resolve and re-check.
    let canonical_root = root.canonicalize().map_err(|e| Error::Io {
        path: root.display().to_string(),
        message: e.to_string(),
    })?;
    let canonical_dir = dir.canonicalize().map_err(|e| Error::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    if !canonical_dir.starts_with(&canonical_root) {
        return Err(Error::InvalidPath {
            path: folder.to_string(),
            reason: "resolves outside the served root",
        });
    }

    let mut names_and_sizes = Vec::new();
    let read_dir = std::fs::read_dir(&canonical_dir).map_err(|e| Error::Io {
        path: canonical_dir.display().to_string(),
        message: e.to_string(),
    })?;
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::Io {
            path: canonical_dir.display().to_string(),
            message: e.to_string(),
        })?;
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if supported_extension(&file_name).is_none() {
            continue;
        }
        let metadata = entry.metadata().map_err(|e| Error::Io {
            path: file_name.clone(),
            message: e.to_string(),
        })?;
        if !metadata.is_file() {
            continue;
        }
        names_and_sizes.push((file_name, metadata.len() / 1024));
    }
    names_and_sizes.sort();

    let files = names_and_sizes
        .iter()
        .enumerate()
        .map(|(idx, (name, size_kb))| entry_for(folder, idx, name, *size_kb))
        .collect::<Vec<_>>();

    tracing::debug!(folder, count = files.len(), "listed overlay folder");

    Ok(Listing {
        success: true,
        folder: folder.to_string(),
        count: files.len(),
        files,
    })
}
