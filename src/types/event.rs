//! SyncEvent - What a reconciliation pass did, path by path

use super::{RelativePath, SyncError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of operation applied to the replica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncOp {
    /// Replica-only file deleted
    RemovedFile,

    /// Source file copied to a path missing from the replica
    CopiedFile,

    /// Replica file overwritten because digests differ
    UpdatedFile,

    /// Replica folder created
    CreatedFolder,

    /// Replica folder removed with everything below it
    RemovedFolder,
}

impl SyncOp {
    /// Log label ("Removed", "Created folder", ...)
    pub fn label(&self) -> &'static str {
        match self {
            SyncOp::RemovedFile => "Removed",
            SyncOp::CopiedFile => "Copied",
            SyncOp::UpdatedFile => "Updated",
            SyncOp::CreatedFolder => "Created folder",
            SyncOp::RemovedFolder => "Removed folder",
        }
    }

    /// Imperative form used in failure messages ("copy", "remove folder", ...)
    pub fn verb(&self) -> &'static str {
        match self {
            SyncOp::RemovedFile => "remove",
            SyncOp::CopiedFile => "copy",
            SyncOp::UpdatedFile => "update",
            SyncOp::CreatedFolder => "create folder",
            SyncOp::RemovedFolder => "remove folder",
        }
    }
}

/// One recorded step of a pass
#[derive(Debug)]
pub enum SyncEvent {
    /// Operation succeeded
    Applied { op: SyncOp, path: RelativePath },

    /// Operation failed; the pass went on with other paths
    Failed {
        op: SyncOp,
        path: RelativePath,
        error: SyncError,
    },
}

impl SyncEvent {
    pub fn op(&self) -> SyncOp {
        match self {
            SyncEvent::Applied { op, .. } | SyncEvent::Failed { op, .. } => *op,
        }
    }

    pub fn path(&self) -> &RelativePath {
        match self {
            SyncEvent::Applied { path, .. } | SyncEvent::Failed { path, .. } => path,
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncEvent::Applied { .. } => None,
            SyncEvent::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyncEvent::Failed { .. })
    }
}

/// Optional callback receiving each event as it is recorded.
pub type EventCallback = dyn Fn(&SyncEvent) + Send + Sync;

/// Per-pass counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub removed_files: usize,
    pub copied_files: usize,
    pub updated_files: usize,
    pub created_folders: usize,
    pub removed_folders: usize,
    /// Source files whose replica copy already matched
    pub unchanged_files: usize,
    pub failures: usize,
    /// Bytes written by copies and updates
    pub bytes_copied: u64,
}

impl SyncStats {
    /// Number of successful operations of any kind
    pub fn operations(&self) -> usize {
        self.removed_files
            + self.copied_files
            + self.updated_files
            + self.created_folders
            + self.removed_folders
    }

    fn count(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::Failed { .. } => self.failures += 1,
            SyncEvent::Applied { op, .. } => match op {
                SyncOp::RemovedFile => self.removed_files += 1,
                SyncOp::CopiedFile => self.copied_files += 1,
                SyncOp::UpdatedFile => self.updated_files += 1,
                SyncOp::CreatedFolder => self.created_folders += 1,
                SyncOp::RemovedFolder => self.removed_folders += 1,
            },
        }
    }
}

/// Everything one reconciliation pass did, in order
#[derive(Debug)]
pub struct SyncOutcome {
    pub events: Vec<SyncEvent>,
    pub stats: SyncStats,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
}

impl SyncOutcome {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            stats: SyncStats::default(),
            started_at: Local::now(),
            duration: Duration::from_secs(0),
        }
    }

    /// Record an event, forwarding it to `on_event` first.
    pub fn record(&mut self, event: SyncEvent, on_event: Option<&EventCallback>) {
        if let Some(callback) = on_event {
            callback(&event);
        }
        self.stats.count(&event);
        self.events.push(event);
    }

    pub fn applied(&mut self, op: SyncOp, path: RelativePath, on_event: Option<&EventCallback>) {
        self.record(SyncEvent::Applied { op, path }, on_event);
    }

    pub fn failed(
        &mut self,
        op: SyncOp,
        path: RelativePath,
        error: SyncError,
        on_event: Option<&EventCallback>,
    ) {
        self.record(SyncEvent::Failed { op, path, error }, on_event);
    }

    /// Successful (op, path) pairs in the order they happened
    pub fn operations(&self) -> impl Iterator<Item = (SyncOp, &RelativePath)> {
        self.events.iter().filter_map(|event| match event {
            SyncEvent::Applied { op, path } => Some((*op, path)),
            SyncEvent::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &SyncEvent> {
        self.events.iter().filter(|event| event.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.stats.failures > 0
    }

    /// True when the pass neither changed nor failed anything
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// One-line pass summary for logs
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        format!(
            "Copied: {}  Updated: {}  Removed: {}  Folders +{} -{}  Unchanged: {}  Failed: {} ({} bytes in {:.2?})",
            stats.copied_files,
            stats.updated_files,
            stats.removed_files,
            stats.created_folders,
            stats.removed_folders,
            stats.unchanged_files,
            stats.failures,
            stats.bytes_copied,
            self.duration
        )
    }
}

impl Default for SyncOutcome {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_labels_match_log_wording() {
        assert_eq!(SyncOp::RemovedFile.label(), "Removed");
        assert_eq!(SyncOp::CopiedFile.label(), "Copied");
        assert_eq!(SyncOp::UpdatedFile.label(), "Updated");
        assert_eq!(SyncOp::CreatedFolder.label(), "Created folder");
        assert_eq!(SyncOp::RemovedFolder.label(), "Removed folder");
        assert_eq!(SyncOp::CreatedFolder.verb(), "create folder");
    }

    #[test]
    fn test_record_updates_stats() {
        let mut outcome = SyncOutcome::new();
        outcome.applied(SyncOp::CopiedFile, RelativePath::new("a.txt"), None);
        outcome.applied(SyncOp::CreatedFolder, RelativePath::new("sub"), None);
        outcome.failed(
            SyncOp::UpdatedFile,
            RelativePath::new("b.txt"),
            SyncError::io("b.txt", IoError::new(ErrorKind::PermissionDenied, "denied")),
            None,
        );

        assert_eq!(outcome.stats.copied_files, 1);
        assert_eq!(outcome.stats.created_folders, 1);
        assert_eq!(outcome.stats.failures, 1);
        assert_eq!(outcome.stats.operations(), 2);
        assert!(outcome.has_failures());
        assert!(!outcome.is_noop());

        let failed: Vec<String> = outcome.failures().map(|e| e.path().to_string()).collect();
        assert_eq!(failed, vec!["b.txt"]);
        assert!(outcome.failures().all(|e| e.error().is_some()));
    }

    #[test]
    fn test_operations_preserve_order() {
        let mut outcome = SyncOutcome::new();
        outcome.applied(SyncOp::RemovedFile, RelativePath::new("c.txt"), None);
        outcome.applied(SyncOp::UpdatedFile, RelativePath::new("a.txt"), None);

        let ops: Vec<(SyncOp, String)> = outcome
            .operations()
            .map(|(op, path)| (op, path.to_string()))
            .collect();
        assert_eq!(
            ops,
            vec![
                (SyncOp::RemovedFile, "c.txt".to_string()),
                (SyncOp::UpdatedFile, "a.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_callback_sees_every_event() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = Arc::clone(&seen);
        let callback = move |event: &SyncEvent| {
            seen_ref
                .lock()
                .expect("lock events")
                .push(format!("{} {}", event.op().label(), event.path()));
        };

        let mut outcome = SyncOutcome::new();
        outcome.applied(SyncOp::CreatedFolder, RelativePath::new("sub"), Some(&callback));
        outcome.applied(SyncOp::CopiedFile, RelativePath::new("sub/b.txt"), Some(&callback));

        let snapshot = seen.lock().expect("lock events snapshot").clone();
        assert_eq!(snapshot, vec!["Created folder sub", "Copied sub/b.txt"]);
    }

    #[test]
    fn test_empty_outcome_is_noop() {
        let outcome = SyncOutcome::default();
        assert!(outcome.is_noop());
        assert!(!outcome.has_failures());
        assert!(outcome.summary().contains("Copied: 0"));
    }
}
