//! Audio streaming functionality

use super::{
    server::error_response,
    state::{GuardedLibrary, ServerState},
};
use crate::library::path_guard::resolve_under;
use axum::{
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::Path as FsPath;

use tokio::{
    fs::File,
    io::{AsyncSeekExt, BufReader, SeekFrom},
};
use tokio_util::io::ReaderStream;
use tracing::debug;

const HEADER_BYTE_RANGE: &str = "Range";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: Option<u64>,
    end_inclusive: Option<u64>,
}

impl ByteRange {
    pub fn new(start_inclusive: Option<u64>, end_inclusive: Option<u64>) -> ByteRange {
        ByteRange {
            start_inclusive,
            end_inclusive,
        }
    }

    fn parse<S: AsRef<str>>(s: S) -> Option<ByteRange> {
        let v = s.as_ref();
        if !v.starts_with("bytes=") {
            return None;
        }

        let v = &v[6..];
        let parts: Vec<&str> = v.split('-').collect();
        if parts.len() != 2 {
            return None;
        }

        Some(ByteRange {
            start_inclusive: parts[0].parse::<u64>().ok(),
            end_inclusive: parts[1].parse::<u64>().ok(),
        })
    }
}

pub struct ByteRangeExtractionError {}

impl IntoResponse for ByteRangeExtractionError {
    fn into_response(self) -> Response {
        StatusCode::BAD_REQUEST.into_response()
    }
}

impl FromRequestParts<ServerState> for Option<ByteRange> {
    type Rejection = ByteRangeExtractionError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(HEADER_BYTE_RANGE)
            .map(|x| x.to_str())
            .map(|x| x.ok())
            .and_then(|x| x.and_then(ByteRange::parse)))
    }
}

fn audio_content_type(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

pub async fn stream_audio(
    byte_range: Option<ByteRange>,
    State(library): State<GuardedLibrary>,
    Path(filepath): Path<String>,
) -> Response {
    let library = library.lock().unwrap().clone();
    let library = match library {
        Some(library) => library,
        None => return error_response(StatusCode::BAD_REQUEST, "Music folder not set"),
    };

    // Resolve against the library root, rejecting traversal.
    let path = match resolve_under(library.root(), &filepath) {
        Ok(path) => path,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid file path"),
    };

    if !path.is_file() {
        return error_response(StatusCode::NOT_FOUND, "File not found");
    }

    debug!("Streaming audio from {}", path.display());

    let mut file = match File::open(&path).await {
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Ok(x) => x,
    };

    let mut start_served = 0;
    if let Some(start) = byte_range.and_then(|x| x.start_inclusive) {
        if file.seek(SeekFrom::Start(start)).await.is_err() {
            return StatusCode::BAD_REQUEST.into_response();
        }
        start_served = start;
    }

    let file_length = match file.metadata().await {
        Ok(x) => x.len(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let chunk_size = match byte_range {
        None => file_length,
        Some(ByteRange {
            start_inclusive: None,
            end_inclusive: None,
        }) => file_length,
        Some(ByteRange {
            start_inclusive: None,
            end_inclusive: Some(end),
        }) => end,
        Some(ByteRange {
            start_inclusive: Some(start),
            end_inclusive: None,
        }) => file_length - start,
        Some(ByteRange {
            start_inclusive: Some(start),
            end_inclusive: Some(end),
        }) => end - start + 1,
    };
    let status_code = match byte_range {
        None
        | Some(ByteRange {
            start_inclusive: None,
            end_inclusive: None,
        }) => StatusCode::OK,
        _ => StatusCode::PARTIAL_CONTENT,
    };

    let file_reader = BufReader::with_capacity(4096 * 16, file);
    let stream = ReaderStream::with_capacity(file_reader, 4096 * 16);

    let body = Body::from_stream(stream);

    Response::builder()
        .status(status_code)
        .header("Content-Type", audio_content_type(&path))
        .header("Accept-Ranges", "bytes")
        .header(
            "Content-Range",
            format!(
                "bytes {}-{}/{}",
                start_served,
                (start_served + chunk_size).saturating_sub(1),
                file_length
            ),
        )
        .header("Content-length", chunk_size)
        .body(body)
        .unwrap()
}
