//! Folder reconciliation against live directory state

use super::{entry_kind, EntryKind};
use crate::scanner::list_folders;
use crate::types::{EventCallback, RelativePath, SyncError, SyncOp, SyncOutcome};
use std::fs;
use std::path::Path;

/// Make the replica's folder set match the source's.
///
/// 1. Every replica folder whose source counterpart is not a folder is removed
///    with everything below it.
/// 2. Every source folder missing from the replica is created.
///
/// Removals run first, so a folder moved within the source never collides
/// with its old location. Failures are recorded per folder; a tree that cannot
/// be listed at all is recorded as one failure on the root.
pub fn reconcile_folders(
    source_root: &Path,
    replica_root: &Path,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) {
    remove_extraneous_folders(source_root, replica_root, outcome, on_event);
    create_missing_folders(source_root, replica_root, outcome, on_event);
}

fn remove_extraneous_folders(
    source_root: &Path,
    replica_root: &Path,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) {
    let folders = match list_folders(replica_root) {
        Ok(folders) => folders,
        Err(err) => {
            outcome.failed(SyncOp::RemovedFolder, RelativePath::default(), err, on_event);
            return;
        }
    };

    // Listing is sorted, so a removed folder's descendants follow it directly.
    let mut last_removed: Option<RelativePath> = None;

    for folder in folders {
        if last_removed.as_ref().is_some_and(|removed| folder.starts_with(removed)) {
            continue;
        }

        match entry_kind(&folder.to_native(source_root)) {
            Ok(EntryKind::Folder) => continue,
            Ok(EntryKind::Missing | EntryKind::Other) => {}
            Err(err) => {
                outcome.failed(SyncOp::RemovedFolder, folder, err, on_event);
                continue;
            }
        }

        let target = folder.to_native(replica_root);
        match fs::remove_dir_all(&target) {
            Ok(()) => {
                outcome.applied(SyncOp::RemovedFolder, folder.clone(), on_event);
                last_removed = Some(folder);
            }
            Err(e) => outcome.failed(
                SyncOp::RemovedFolder,
                folder,
                SyncError::io(target, e),
                on_event,
            ),
        }
    }
}

fn create_missing_folders(
    source_root: &Path,
    replica_root: &Path,
    outcome: &mut SyncOutcome,
    on_event: Option<&EventCallback>,
) {
    let folders = match list_folders(source_root) {
        Ok(folders) => folders,
        Err(err) => {
            outcome.failed(SyncOp::CreatedFolder, RelativePath::default(), err, on_event);
            return;
        }
    };

    for folder in folders {
        let target = folder.to_native(replica_root);
        match entry_kind(&target) {
            Ok(EntryKind::Folder) => continue,
            Ok(EntryKind::Missing) => {}
            Ok(EntryKind::Other) => match fs::remove_file(&target) {
                Ok(()) => outcome.applied(SyncOp::RemovedFile, folder.clone(), on_event),
                Err(e) => {
                    outcome.failed(
                        SyncOp::CreatedFolder,
                        folder,
                        SyncError::io(target, e),
                        on_event,
                    );
                    continue;
                }
            },
            Err(err) => {
                outcome.failed(SyncOp::CreatedFolder, folder, err, on_event);
                continue;
            }
        }

        match fs::create_dir(&target) {
            Ok(()) => outcome.applied(SyncOp::CreatedFolder, folder, on_event),
            Err(e) => outcome.failed(
                SyncOp::CreatedFolder,
                folder,
                SyncError::io(target, e),
                on_event,
            ),
        }
    }
}
