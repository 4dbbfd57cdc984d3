//! Artwork discovery for one audio file.

use super::decoder::{DecodedAudio, EmbeddedPicture};
use std::fs;
use std::path::Path;
use tracing::warn;

// Checked in order. Matching is exact and case-sensitive.
const SIBLING_CANDIDATES: &[(&str, &str)] = &[
    ("cover.jpg", "image/jpeg"),
    ("cover.png", "image/png"),
    ("folder.jpg", "image/jpeg"),
    ("folder.png", "image/png"),
    ("album.jpg", "image/jpeg"),
    ("album.png", "image/png"),
];

/// Raw artwork bytes with their declared MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

/// Locates artwork for a decoded audio file.
///
/// Sources are tried in priority order and the first hit wins: ID3-style
/// embedded pictures, then Vorbis-style embedded pictures, then sibling image
/// files in the track's directory. Returns `None` when all three come up
/// empty; the caller must not cache in that case.
pub fn resolve(decoded: &DecodedAudio, sibling_dir: &Path) -> Option<Artwork> {
    if let Some(artwork) = first_embedded(&decoded.id3_pictures) {
        return Some(artwork);
    }
    if let Some(artwork) = first_embedded(&decoded.vorbis_pictures) {
        return Some(artwork);
    }
    sibling_probe(sibling_dir)
}

fn first_embedded(pictures: &[EmbeddedPicture]) -> Option<Artwork> {
    pictures
        .iter()
        .find(|picture| !picture.data.is_empty())
        .map(|picture| Artwork {
            data: picture.data.clone(),
            mime: picture.mime.clone(),
        })
}

fn sibling_probe(dir: &Path) -> Option<Artwork> {
    for (name, mime) in SIBLING_CANDIDATES {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        match fs::read(&candidate) {
            Ok(data) => {
                return Some(Artwork {
                    data,
                    mime: Some((*mime).to_owned()),
                })
            }
            // An unreadable candidate counts as absent.
            Err(err) => warn!("Failed to read sibling artwork {}: {}", candidate.display(), err),
        }
    }
    None
}
