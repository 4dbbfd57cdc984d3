use thiserror::Error;

/// Errors produced while resolving and serving library content.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("music folder not set")]
    FolderNotSet,

    #[error("invalid directory path")]
    InvalidDirectory,

    /// The requested path escapes its root. The resolved absolute path is
    /// never included in the message.
    #[error("invalid file path")]
    Traversal,

    #[error("file not found")]
    NotFound,

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("failed to write artwork cache entry: {0}")]
    CacheWrite(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
