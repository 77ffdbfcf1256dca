//! Error types for treemirror

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for treemirror operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// IO error tied to the path that caused it
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed while building a snapshot
    #[error("Walk error: {0}")]
    Walk(String),

    /// Source root is missing or is not a directory
    #[error("Source unavailable: {0}")]
    SourceUnavailable(PathBuf),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Build an `Io` error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Adapter for `map_err`: attaches `path` to a raw `io::Error`.
    pub fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> SyncError + '_ {
        move |source| SyncError::io(path, source)
    }

    /// The underlying IO error kind, if any
    pub fn io_kind(&self) -> Option<ErrorKind> {
        match self {
            SyncError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Check if this error means the path did not exist
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(ErrorKind::NotFound)
    }

    /// Check if this error is related to permissions
    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == Some(ErrorKind::PermissionDenied)
    }

    /// Check if this error must stop the process before the sync loop starts
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}
