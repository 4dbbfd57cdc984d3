//! Music library core: tag resolution, artwork discovery, artwork caching
//! and safe path resolution for the two serving roots.

pub mod art_cache;
pub mod artwork;
pub mod decoder;
mod error;
pub mod path_guard;
pub mod scanner;
pub mod tags;

pub use error::LibraryError;

use art_cache::ArtworkCache;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_SUBDIR: &str = ".cache";
const ALBUM_ART_SUBDIR: &str = "album_art";

/// One indexed audio file, as returned by the library listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Whole seconds.
    pub duration: u64,
    /// Relative to the library root, forward-slash separated.
    pub filepath: String,
    pub album_art_url: Option<String>,
}

/// The two validated roots everything resolves against.
///
/// The library root is the user-selected directory; the artwork cache lives
/// under `<root>/.cache/album_art` and is created on selection. Every served
/// path resolves against exactly one of the two roots.
#[derive(Debug, Clone)]
pub struct MusicLibrary {
    root: PathBuf,
    art_cache: ArtworkCache,
}

impl MusicLibrary {
    /// Validates `path` as the library root and prepares the artwork cache
    /// directory underneath it.
    pub fn open(path: impl AsRef<Path>) -> Result<MusicLibrary, LibraryError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(LibraryError::InvalidDirectory);
        }
        // Cache keys are derived from absolute source paths; pin the root.
        let root = path.canonicalize()?;

        let cache_dir = root.join(CACHE_SUBDIR).join(ALBUM_ART_SUBDIR);
        fs::create_dir_all(&cache_dir)?;

        Ok(MusicLibrary {
            root,
            art_cache: ArtworkCache::new(cache_dir),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn art_cache(&self) -> &ArtworkCache {
        &self.art_cache
    }
}
