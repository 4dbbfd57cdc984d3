//! Adapter over the tag-reading library.
//!
//! This is the only module that touches `lofty`; everything downstream works
//! against [`DecodedAudio`], so the tag resolver and the artwork resolver
//! never depend on the underlying library's object shapes.

use super::error::LibraryError;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{ItemKey, ItemValue, TagType};
use std::collections::HashMap;
use std::path::Path;

/// Normalized tag key/value map.
///
/// Well-known fields are stored under generic lowercase keys (`title`,
/// `artist`, `album`). Frames the tag library cannot classify keep their raw
/// identifiers verbatim (e.g. an ID3 frame id), so dialect-specific fallback
/// keys still have something to hit.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: HashMap<String, String>,
}

impl TagMap {
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Returns the first non-empty value among `keys`, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.entries.get(*key))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }
}

/// A picture embedded in the file's own tag structure.
#[derive(Debug, Clone)]
pub struct EmbeddedPicture {
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

/// The decoded view of one audio file, as consumed by the resolvers.
#[derive(Debug, Clone, Default)]
pub struct DecodedAudio {
    pub tags: TagMap,
    /// Pictures found in ID3v2 frames, in frame order.
    pub id3_pictures: Vec<EmbeddedPicture>,
    /// Pictures found in Vorbis comments, in list order.
    pub vorbis_pictures: Vec<EmbeddedPicture>,
    /// Whole seconds, truncated toward zero.
    pub duration_secs: u64,
}

/// Reads tags, embedded pictures and duration from an audio file.
pub fn decode(path: &Path) -> Result<DecodedAudio, LibraryError> {
    let tagged = lofty::read_from_path(path).map_err(|err| LibraryError::Decode {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let mut decoded = DecodedAudio {
        duration_secs: tagged.properties().duration().as_secs(),
        ..DecodedAudio::default()
    };

    for tag in tagged.tags() {
        for item in tag.items() {
            let value = match item.value() {
                ItemValue::Text(text) => text.as_str(),
                _ => continue,
            };
            match item.key() {
                ItemKey::TrackTitle => decoded.tags.insert_first("title", value),
                ItemKey::TrackArtist => decoded.tags.insert_first("artist", value),
                ItemKey::AlbumTitle => decoded.tags.insert_first("album", value),
                ItemKey::Unknown(raw) => decoded.tags.insert_first(raw.clone(), value),
                _ => {}
            }
        }

        let bucket = match tag.tag_type() {
            TagType::Id3v2 => &mut decoded.id3_pictures,
            TagType::VorbisComments => &mut decoded.vorbis_pictures,
            _ => continue,
        };
        for picture in tag.pictures() {
            bucket.push(EmbeddedPicture {
                data: picture.data().to_vec(),
                mime: picture.mime_type().map(|mime| mime.as_str().to_string()),
            });
        }
    }

    Ok(decoded)
}
