//! Hashing utilities

use crate::types::{ContentDigest, SyncError};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read size used when hashing files from disk
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Compute the Blake3 digest of a file
///
/// The file is streamed in 64KB chunks, never loaded whole.
///
/// # Arguments
/// * `file_path` - Path to a readable regular file
///
/// # Returns
/// * `Ok(ContentDigest)` - 32-byte Blake3 digest
/// * `Err(SyncError::Io)` - file could not be opened or read, with its path
///
/// # Example
/// ```no_run
/// use treemirror::hash::compute_hash;
/// use std::path::Path;
///
/// let digest = compute_hash(Path::new("file.txt"))?;
/// println!("{digest}");
/// # Ok::<(), treemirror::types::SyncError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<ContentDigest, SyncError> {
    let file = File::open(file_path).map_err(SyncError::io_at(file_path))?;
    hash_reader(file, HASH_CHUNK_SIZE).map_err(SyncError::io_at(file_path))
}

/// Stream `reader` into a Blake3 hasher `chunk_size` bytes at a time.
///
/// The digest only depends on the bytes read, not on `chunk_size`. A zero
/// chunk size is treated as 1.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> std::io::Result<ContentDigest> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break, // EOF
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().into())
}
