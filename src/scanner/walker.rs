//! Sequential tree walker

use crate::hash::compute_hash;
use crate::types::{RelativePath, Snapshot, SyncError};
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Build a Snapshot of every regular file under `root_path`
///
/// Walks the tree recursively and hashes each regular file. Nothing is
/// filtered: hidden files and ignore files are mirrored like any other file.
/// Symlinks are not followed; they and sockets or FIFOs are recorded in
/// `others` without being read.
///
/// # Returns
/// * `Ok(Snapshot)` - one entry per regular file; empty when `root_path` does
///   not exist
/// * `Err(SyncError)` - the root is not a directory, the walk failed, or a
///   file vanished or became unreadable before it could be hashed
pub fn snapshot_tree(root_path: &Path) -> Result<Snapshot, SyncError> {
    let start_time = Instant::now();
    let mut snapshot = Snapshot::new(root_path.to_path_buf());

    if !root_is_walkable(root_path)? {
        return Ok(snapshot);
    }

    for result in build_walker(root_path) {
        let entry = result.map_err(walk_error)?;
        if entry.depth() == 0 {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            snapshot.increment_dirs();
            continue;
        }

        let relative_path = relative_to(root_path, &entry)?;
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), "not hashing non-regular entry");
            snapshot.insert_other(relative_path);
            continue;
        }

        let digest = compute_hash(entry.path())?;
        let size = entry
            .metadata()
            .map(|metadata| metadata.len())
            .map_err(walk_error)?;

        snapshot.insert(relative_path, digest, size);
    }

    snapshot.set_scan_duration(start_time.elapsed());
    debug!(
        root = %root_path.display(),
        files = snapshot.len(),
        dirs = snapshot.total_dirs,
        bytes = snapshot.total_size,
        "snapshot complete"
    );

    Ok(snapshot)
}

/// List every subdirectory under `root_path`, parents before children
///
/// Symlinks to directories are not listed. A missing root yields an empty list.
pub fn list_folders(root_path: &Path) -> Result<Vec<RelativePath>, SyncError> {
    let mut folders = Vec::new();

    if !root_is_walkable(root_path)? {
        return Ok(folders);
    }

    for result in build_walker(root_path) {
        let entry = result.map_err(walk_error)?;
        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            folders.push(relative_to(root_path, &entry)?);
        }
    }

    folders.sort();
    Ok(folders)
}

fn build_walker(root_path: &Path) -> ignore::Walk {
    WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .build()
}

/// `Ok(false)` for a missing root, an error when it exists but is not a folder.
fn root_is_walkable(root_path: &Path) -> Result<bool, SyncError> {
    match fs::metadata(root_path) {
        Ok(metadata) if metadata.is_dir() => Ok(true),
        Ok(_) => Err(SyncError::Walk(format!(
            "{} is not a directory",
            root_path.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SyncError::io(root_path, e)),
    }
}

fn relative_to(root_path: &Path, entry: &DirEntry) -> Result<RelativePath, SyncError> {
    RelativePath::from_root(root_path, entry.path()).ok_or_else(|| {
        SyncError::Walk(format!(
            "{} is outside of {}",
            entry.path().display(),
            root_path.display()
        ))
    })
}

fn walk_error(error: ignore::Error) -> SyncError {
    SyncError::Walk(error.to_string())
}
