//! Atomic file copy implementation

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tempfile::Builder;

/// Name prefix of the hidden file a copy is staged in
pub const STAGING_PREFIX: &str = ".treemirror-";

/// Name suffix of the hidden file a copy is staged in
pub const STAGING_SUFFIX: &str = ".part";

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Stream the source into a new hidden `.treemirror-XXXXXX.part` sibling
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over the final destination
///
/// The staging name is random and created exclusively, so it never replaces
/// an existing entry next to `dest`. The destination's parent folder must
/// already exist. An existing file at `dest` is replaced; readers see either
/// the old or the new content, never a partial write. On failure the staging
/// file is removed.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SyncError::Io)` - with the path that failed
///
/// # Example
/// ```no_run
/// use treemirror::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), treemirror::types::SyncError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    let staging_dir = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // ═══════════════════════════════════════════════════════════
    // STEP 1: Copy - Stream from src to a fresh staging file
    // ═══════════════════════════════════════════════════════════
    let mut src_file = File::open(src).map_err(SyncError::io_at(src))?;
    let mut staged = Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(staging_dir)
        .map_err(SyncError::io_at(staging_dir))?;
    let staged_path = staged.path().to_path_buf();

    let total_bytes = stream_copy(&mut src_file, staged.as_file_mut(), src, &staged_path)?;

    // ═══════════════════════════════════════════════════════════
    // STEP 2: Flush - Force OS to write data to physical disk
    // ═══════════════════════════════════════════════════════════
    staged
        .as_file()
        .sync_all()
        .map_err(SyncError::io_at(&staged_path))?;

    // ═══════════════════════════════════════════════════════════
    // STEP 3: Metadata - Preserve permissions and mtime
    // ═══════════════════════════════════════════════════════════
    let src_metadata = src_file.metadata().map_err(SyncError::io_at(src))?;

    fs::set_permissions(&staged_path, src_metadata.permissions())
        .map_err(SyncError::io_at(&staged_path))?;

    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    let atime = filetime::FileTime::from_last_access_time(&src_metadata);
    filetime::set_file_times(&staged_path, atime, mtime)
        .map_err(SyncError::io_at(&staged_path))?;

    // ═══════════════════════════════════════════════════════════
    // STEP 4: Commit - Rename over the final destination
    // ═══════════════════════════════════════════════════════════
    // A failed persist hands the file back and dropping it deletes it.
    staged
        .persist(dest)
        .map_err(|persist_error| SyncError::io(dest, persist_error.error))?;

    Ok(total_bytes)
}

fn stream_copy(
    reader: &mut File,
    writer: &mut File,
    src: &Path,
    staged_path: &Path,
) -> Result<u64, SyncError> {
    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break, // EOF
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SyncError::io(src, e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(SyncError::io_at(staged_path))?;
        total_bytes += bytes_read as u64;
    }

    Ok(total_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_failed_copy_leaves_no_staging_file() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let dest = temp_dir.path().join("dest.txt");

        let error = copy_file_atomic(&temp_dir.path().join("missing.txt"), &dest).unwrap_err();

        assert!(error.is_not_found());
        assert!(entry_names(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_sibling_with_staging_like_name_is_untouched() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join("src.txt");
        let dest = temp_dir.path().join("x");
        let sibling = temp_dir.path().join("x.treemirror-part");
        fs::write(&src, b"new").expect("write src");
        fs::write(&dest, b"old").expect("write dest");
        fs::write(&sibling, b"user data").expect("write sibling");

        copy_file_atomic(&src, &dest).expect("copy succeeds");

        assert_eq!(fs::read(&dest).expect("read dest"), b"new");
        assert_eq!(fs::read(&sibling).expect("read sibling"), b"user data");
        assert_eq!(entry_names(temp_dir.path()), vec!["src.txt", "x", "x.treemirror-part"]);
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join("src.txt");
        fs::write(&src, b"x").expect("write src");

        let result = copy_file_atomic(&src, &temp_dir.path().join("no/such/dir/dest.txt"));
        assert!(result.is_err());
    }
}
