//! File plan generation

use crate::diff::{compare_digests, FilePlan};
use crate::types::{RelativePath, Snapshot};
use std::collections::BTreeSet;

/// Diff two snapshots into the file operations that converge `replica` onto `source`
///
/// Both snapshots are path-ordered, so the plan is deterministic: removals
/// ascending, then transfers ascending. A replica symlink or special file is
/// removed unless the source has a file, symlink or special file at the same
/// path.
///
/// # Example
/// ```
/// use treemirror::diff::plan_files;
/// use treemirror::types::{ContentDigest, RelativePath, Snapshot};
/// use std::path::PathBuf;
///
/// let mut source = Snapshot::new(PathBuf::from("src"));
/// let mut replica = Snapshot::new(PathBuf::from("replica"));
/// source.insert(RelativePath::new("a.txt"), ContentDigest::of(b"hello"), 5);
/// replica.insert(RelativePath::new("a.txt"), ContentDigest::of(b"HELLO"), 5);
/// replica.insert(RelativePath::new("c.txt"), ContentDigest::of(b"stale"), 5);
///
/// let plan = plan_files(&source, &replica);
/// assert_eq!(plan.stats.remove_count, 1);
/// assert_eq!(plan.stats.update_count, 1);
/// ```
pub fn plan_files(source: &Snapshot, replica: &Snapshot) -> FilePlan {
    let mut plan = FilePlan::new();

    let mut removals: BTreeSet<&RelativePath> =
        replica.paths().filter(|path| !source.contains(path)).collect();
    removals.extend(
        replica
            .others
            .iter()
            .filter(|path| !source.contains(path) && !source.has_other(path)),
    );
    for path in removals {
        plan.add_removal(path.clone());
    }

    for (path, digest) in source.iter() {
        plan.add_transfer(compare_digests(path, digest, replica.get(path)));
    }

    plan
}
