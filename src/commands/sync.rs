//! Reconciliation pass: the single entry point of the sync core

use crate::executor::{reconcile_files, reconcile_folders};
use crate::scanner::snapshot_tree;
use crate::types::{EventCallback, SyncError, SyncOutcome};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Run one full reconciliation pass of `replica` onto `source`.
///
/// See [`reconcile_with`].
pub fn reconcile(source: &Path, replica: &Path) -> Result<SyncOutcome, SyncError> {
    reconcile_with(source, replica, None)
}

/// Run one full reconciliation pass, streaming each event to `on_event`.
///
/// Order of work:
/// 1. check the source root is a directory
/// 2. create the replica root if missing
/// 3. snapshot both trees
/// 4. reconcile files (removals, then copies and updates)
/// 5. reconcile folders (removals, then creations)
///
/// # Errors
/// Pass-level failures only: the source root is missing or not a directory,
/// the replica root cannot be created, or a snapshot cannot be built. Nothing
/// in the replica has been touched when this returns `Err`. Failures on
/// individual paths are recorded in the returned outcome instead.
pub fn reconcile_with(
    source: &Path,
    replica: &Path,
    on_event: Option<&EventCallback>,
) -> Result<SyncOutcome, SyncError> {
    let start_time = Instant::now();
    let mut outcome = SyncOutcome::new();

    if !fs::metadata(source).is_ok_and(|metadata| metadata.is_dir()) {
        return Err(SyncError::SourceUnavailable(source.to_path_buf()));
    }
    fs::create_dir_all(replica).map_err(SyncError::io_at(replica))?;

    let source_snapshot = snapshot_tree(source)?;
    let replica_snapshot = snapshot_tree(replica)?;
    debug!(
        source_files = source_snapshot.len(),
        replica_files = replica_snapshot.len(),
        "snapshots ready"
    );

    reconcile_files(
        source,
        replica,
        &source_snapshot,
        &replica_snapshot,
        &mut outcome,
        on_event,
    );
    reconcile_folders(source, replica, &mut outcome, on_event);

    outcome.set_duration(start_time.elapsed());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SyncOp;
    use tempfile::TempDir;

    #[test]
    fn test_missing_source_is_pass_level_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let replica = temp_dir.path().join("replica");
        fs::create_dir(&replica).expect("create replica");
        fs::write(replica.join("keep.txt"), b"precious").expect("write replica file");

        let error = reconcile(&temp_dir.path().join("typo"), &replica).unwrap_err();

        assert!(matches!(error, SyncError::SourceUnavailable(_)));
        assert_eq!(
            fs::read(replica.join("keep.txt")).expect("replica untouched"),
            b"precious"
        );
    }

    #[test]
    fn test_source_that_is_a_file_is_unavailable() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let file = temp_dir.path().join("source.txt");
        fs::write(&file, b"x").expect("write file");

        let error = reconcile(&file, &temp_dir.path().join("replica")).unwrap_err();
        assert!(matches!(error, SyncError::SourceUnavailable(_)));
    }

    #[test]
    fn test_missing_replica_root_is_created() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target parent");
        fs::write(source.path().join("a.txt"), b"hello").expect("write source");
        let replica = target.path().join("nested/replica");

        let outcome = reconcile(source.path(), &replica).expect("pass succeeds");

        assert_eq!(outcome.stats.copied_files, 1);
        assert_eq!(fs::read(replica.join("a.txt")).expect("read copy"), b"hello");
    }

    #[test]
    fn test_replica_root_that_is_a_file_fails_pass() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target parent");
        let replica = target.path().join("replica");
        fs::write(&replica, b"in the way").expect("write blocker");

        // Io errors fail the whole pass here, not just one path
        let error = reconcile(source.path(), &replica).unwrap_err();
        assert!(matches!(error, SyncError::Io { ref path, .. } if path == &replica));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_streamed_events_match_returned_outcome() {
        use std::sync::{Arc, Mutex};

        let source = TempDir::new().expect("create source");
        let replica = TempDir::new().expect("create replica");
        fs::create_dir(source.path().join("sub")).expect("create sub");
        fs::write(source.path().join("sub/b.txt"), b"world").expect("write source");

        let streamed: Arc<Mutex<Vec<SyncOp>>> = Arc::new(Mutex::new(Vec::new()));
        let streamed_ref = Arc::clone(&streamed);
        let callback = move |event: &crate::types::SyncEvent| {
            streamed_ref.lock().expect("lock").push(event.op());
        };

        let outcome =
            reconcile_with(source.path(), replica.path(), Some(&callback)).expect("pass succeeds");

        let returned: Vec<SyncOp> = outcome.events.iter().map(|e| e.op()).collect();
        assert_eq!(*streamed.lock().expect("lock"), returned);
        assert_eq!(returned, vec![SyncOp::CreatedFolder, SyncOp::CopiedFile]);
    }
}
