//! Recursive library scan: walk, decode, resolve, assemble.

use super::artwork;
use super::decoder;
use super::error::LibraryError;
use super::tags::TrackTags;
use super::{MusicLibrary, TrackMetadata};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a"];

const DEFAULT_ARTIST: &str = "Unknown Artist";
const DEFAULT_ALBUM: &str = "Unknown Album";

/// Walks the library root and assembles one [`TrackMetadata`] per supported
/// audio file.
///
/// Result order follows filesystem walk order, which is not stable across
/// platforms; callers that need a fixed order must sort. A file that fails
/// to decode is skipped, the scan continues. An unreadable root fails the
/// whole scan.
pub fn scan(library: &MusicLibrary) -> Result<Vec<TrackMetadata>, LibraryError> {
    let mut tracks = Vec::new();

    for entry in WalkDir::new(library.root()) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(LibraryError::Io(err.into()));
            }
            Err(err) => {
                debug!("Skipping unreadable entry during scan: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_supported(entry.path()) {
            continue;
        }

        match scan_file(library, entry.path()) {
            Ok(track) => tracks.push(track),
            Err(err) => debug!("Skipping {}: {}", entry.path().display(), err),
        }
    }

    Ok(tracks)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|supported| *supported == ext)
        })
        .unwrap_or(false)
}

fn scan_file(library: &MusicLibrary, path: &Path) -> Result<TrackMetadata, LibraryError> {
    let decoded = decoder::decode(path)?;
    let tags = TrackTags::resolve(&decoded);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = tags.title.unwrap_or(file_name);
    let artist = tags.artist.unwrap_or_else(|| DEFAULT_ARTIST.to_owned());
    let album = tags.album.unwrap_or_else(|| DEFAULT_ALBUM.to_owned());

    let sibling_dir = path.parent().unwrap_or(library.root());
    let album_art_url = artwork::resolve(&decoded, sibling_dir).and_then(|art| {
        match library.art_cache().store(path, &artist, &album, &art) {
            Ok(filename) => Some(format!("/api/album_art/{}", filename)),
            // Degrade to no artwork URL, the track still appears.
            Err(err) => {
                warn!("Failed to cache artwork for {}: {}", path.display(), err);
                None
            }
        }
    });

    Ok(TrackMetadata {
        title,
        artist,
        album,
        duration: tags.duration_secs,
        filepath: relative_slash_path(library.root(), path),
        album_art_url,
    })
}

/// Path relative to `root`, joined with forward slashes on every platform.
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
