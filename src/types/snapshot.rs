//! Snapshot - Content-addressed view of one tree's files

use super::{ContentDigest, RelativePath};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

/// Point-in-time map of every regular file under a root to its digest
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Map: relative_path → digest
    pub entries: BTreeMap<RelativePath, ContentDigest>,

    /// Symlinks and special files: present, but never hashed or copied
    pub others: BTreeSet<RelativePath>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_dirs: usize,

    /// Scan metadata
    #[serde(skip)]
    pub scan_duration: Duration,
    pub root_path: PathBuf,
}

impl Snapshot {
    /// Create a new empty Snapshot
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            others: BTreeSet::new(),
            total_size: 0,
            total_dirs: 0,
            scan_duration: Duration::from_secs(0),
            root_path,
        }
    }

    /// Insert a file's digest, adding `size` bytes to the running total.
    ///
    /// Returns the digest previously stored under `path`, if any.
    pub fn insert(
        &mut self,
        path: RelativePath,
        digest: ContentDigest,
        size: u64,
    ) -> Option<ContentDigest> {
        self.total_size += size;
        self.entries.insert(path, digest)
    }

    /// Record a symlink or special file found at `path`
    pub fn insert_other(&mut self, path: RelativePath) {
        self.others.insert(path);
    }

    /// True when `path` is a symlink or special file in this tree
    pub fn has_other(&self, path: &RelativePath) -> bool {
        self.others.contains(path)
    }

    pub fn get(&self, path: &RelativePath) -> Option<&ContentDigest> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    /// Return the number of files in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over (path, digest) pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &ContentDigest)> {
        self.entries.iter()
    }

    /// Iterator over just the paths
    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.keys()
    }

    /// True when both snapshots hold the same paths with the same digests,
    /// whatever their roots.
    pub fn same_files_as(&self, other: &Snapshot) -> bool {
        self.entries == other.entries
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Count one traversed subdirectory
    pub fn increment_dirs(&mut self) {
        self.total_dirs += 1;
    }
}
