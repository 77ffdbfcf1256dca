//! Executor module for replica mutations

pub mod copy;
pub mod files;
pub mod folders;

use crate::types::SyncError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub use copy::copy_file_atomic;
pub use files::{apply_file_plan, reconcile_files};
pub use folders::reconcile_folders;

/// What currently occupies a path, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Missing,
    Folder,
    /// Regular file, symlink or special file
    Other,
}

pub(crate) fn entry_kind(path: &Path) -> Result<EntryKind, SyncError> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_dir() => Ok(EntryKind::Folder),
        Ok(_) => Ok(EntryKind::Other),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(EntryKind::Missing),
        Err(e) => Err(SyncError::io(path, e)),
    }
}
