//! Amplitude Media Server Library
//!
//! Indexes a user-selected directory tree of audio files, extracts metadata
//! and cover artwork from heterogeneous tag formats, and serves both the
//! audio and the artwork over HTTP.

pub mod library;
pub mod server;

// Re-export commonly used types for convenience
pub use library::{LibraryError, MusicLibrary, TrackMetadata};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
