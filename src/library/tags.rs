//! Descriptive metadata resolution over the normalized tag map.

use super::decoder::DecodedAudio;

// Generic key first, legacy ID3 frame id second. The first non-empty value
// wins; a field that resolves nowhere stays unset so the caller can apply
// its own default.
const TITLE_KEYS: &[&str] = &["title", "TIT2"];
const ARTIST_KEYS: &[&str] = &["artist", "TPE1"];
const ALBUM_KEYS: &[&str] = &["album", "TALB"];

/// Tag fields of one track, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_secs: u64,
}

impl TrackTags {
    pub fn resolve(decoded: &DecodedAudio) -> TrackTags {
        TrackTags {
            title: decoded.tags.first_of(TITLE_KEYS).map(str::to_owned),
            artist: decoded.tags.first_of(ARTIST_KEYS).map(str::to_owned),
            album: decoded.tags.first_of(ALBUM_KEYS).map(str::to_owned),
            duration_secs: decoded.duration_secs,
        }
    }
}
