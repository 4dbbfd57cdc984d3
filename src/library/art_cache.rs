//! Content-addressed on-disk store for extracted artwork.
//!
//! Entries are keyed by a digest of the source file's absolute path, not of
//! the image bytes. Re-extracting the same file always maps to the same
//! entry even if the embedded image was re-encoded upstream; two files
//! carrying identical artwork get two entries. Entries are never updated and
//! never evicted.

use super::artwork::Artwork;
use super::error::LibraryError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ArtworkCache {
    dir: PathBuf,
}

impl ArtworkCache {
    pub fn new(dir: impl Into<PathBuf>) -> ArtworkCache {
        ArtworkCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `artwork` for `source` and returns the served filename.
    ///
    /// The filename is deterministic for a given source path, artist, album
    /// and MIME type, so repeated scans resolve to the same entry. If the
    /// entry already exists on disk the write is skipped.
    pub fn store(
        &self,
        source: &Path,
        artist: &str,
        album: &str,
        artwork: &Artwork,
    ) -> Result<String, LibraryError> {
        let filename = format!(
            "{}_{}_{}.{}",
            sanitize(artist),
            sanitize(album),
            cache_key(source),
            extension_for_mime(artwork.mime.as_deref()),
        );

        let entry_path = self.dir.join(&filename);
        if !entry_path.exists() {
            fs::write(&entry_path, &artwork.data).map_err(LibraryError::CacheWrite)?;
            debug!("Cached artwork for {} as {}", source.display(), filename);
        }

        Ok(filename)
    }
}

/// Stable digest of the source file's absolute path string.
fn cache_key(source: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Replaces every non-alphanumeric character with `_`.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn extension_for_mime(mime: Option<&str>) -> &'static str {
    match mime {
        Some(mime) if mime.contains("jpeg") || mime.contains("jpg") => "jpg",
        Some(mime) if mime.contains("png") => "png",
        Some(mime) if mime.contains("gif") => "gif",
        _ => "jpg",
    }
}
