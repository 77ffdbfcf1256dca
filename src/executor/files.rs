//! File reconciliation: apply a FilePlan onto the replica

use super::copy::copy_file_atomic;
use super::{entry_kind, EntryKind};
use crate::diff::{plan_files, FilePlan};
use crate::types::{EventCallback, RelativePath, Snapshot, SyncError, SyncOp, SyncOutcome};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Diff two snapshots and converge the replica's files onto the source's.
///
/// Returns the plan that was applied. Per-path failures are recorded in
/// `outcome` and never stop the batch.
pub fn reconcile_files(
    source_root: &Path,
    replica_root: &Path,
    source: &Snapshot,
    replica: &Snapshot,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) -> FilePlan {
    let plan = plan_files(source, replica);
    outcome.stats.unchanged_files += plan.stats.unchanged_count;
    apply_file_plan(source_root, replica_root, &plan, outcome, on_event);
    plan
}

/// Execute a file plan: every removal first, then copies and updates.
///
/// Copies create missing replica folders on the way, recording a
/// `CreatedFolder` event for each one, outermost first. A folder sitting
/// where the source has a file is removed before the copy.
pub fn apply_file_plan(
    source_root: &Path,
    replica_root: &Path,
    plan: &FilePlan,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) {
    for path in &plan.removals {
        match remove_replica_file(&path.to_native(replica_root)) {
            Ok(()) => outcome.applied(SyncOp::RemovedFile, path.clone(), on_event),
            Err(err) => outcome.failed(SyncOp::RemovedFile, path.clone(), err, on_event),
        }
    }

    for action in &plan.transfers {
        let path = action.path();

        if action.is_copy() {
            if let Err(err) = prepare_destination(replica_root, path, outcome, on_event) {
                outcome.failed(action.op(), path.clone(), err, on_event);
                continue;
            }
        }

        let src = path.to_native(source_root);
        let dest = path.to_native(replica_root);
        match copy_file_atomic(&src, &dest) {
            Ok(bytes) => {
                outcome.stats.bytes_copied += bytes;
                outcome.applied(action.op(), path.clone(), on_event);
            }
            Err(err) => outcome.failed(action.op(), path.clone(), err, on_event),
        }
    }
}

/// Delete one replica file. A file that is already gone counts as removed.
fn remove_replica_file(target: &Path) -> Result<(), SyncError> {
    match fs::remove_file(target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::io(target, e)),
    }
}

/// Make `path`'s replica location ready to receive a new file.
fn prepare_destination(
    replica_root: &Path,
    path: &RelativePath,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) -> Result<(), SyncError> {
    for ancestor in path.ancestors() {
        let native = ancestor.to_native(replica_root);
        match entry_kind(&native)? {
            EntryKind::Folder => continue,
            EntryKind::Missing => {}
            EntryKind::Other => {
                remove_replica_file(&native)?;
                outcome.applied(SyncOp::RemovedFile, ancestor.clone(), on_event);
            }
        }
        fs::create_dir(&native).map_err(SyncError::io_at(&native))?;
        outcome.applied(SyncOp::CreatedFolder, ancestor, on_event);
    }

    let dest = path.to_native(replica_root);
    if entry_kind(&dest)? == EntryKind::Folder {
        match fs::remove_dir_all(&dest) {
            Ok(()) => outcome.applied(SyncOp::RemovedFolder, path.clone(), on_event),
            Err(e) => return Err(SyncError::io(dest, e)),
        }
    }

    Ok(())
}
