//! File comparison logic

use super::FileAction;
use crate::types::{ContentDigest, RelativePath};

/// Decide what a source file needs, given the replica's digest for the same path
///
/// Content is the only signal: sizes and timestamps are never consulted.
///
/// * replica has no entry → `Copy`
/// * digests differ → `Update`
/// * digests match → `None`
pub fn compare_digests(
    path: &RelativePath,
    source: &ContentDigest,
    replica: Option<&ContentDigest>,
) -> Option<FileAction> {
    match replica {
        None => Some(FileAction::Copy(path.clone())),
        Some(existing) if existing != source => Some(FileAction::Update(path.clone())),
        Some(_) => None,
    }
}
