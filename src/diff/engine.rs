//! Diff engine types

use crate::types::{RelativePath, SyncOp};

/// Transfer needed for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Path is missing from the replica
    Copy(RelativePath),

    /// Path exists in the replica with different content
    Update(RelativePath),
}

impl FileAction {
    pub fn path(&self) -> &RelativePath {
        match self {
            FileAction::Copy(path) | FileAction::Update(path) => path,
        }
    }

    /// Event kind recorded when this action is applied
    pub fn op(&self) -> SyncOp {
        match self {
            FileAction::Copy(_) => SyncOp::CopiedFile,
            FileAction::Update(_) => SyncOp::UpdatedFile,
        }
    }

    /// True when the replica has nothing at this path yet
    pub fn is_copy(&self) -> bool {
        matches!(self, FileAction::Copy(_))
    }
}

/// File-level work needed to converge a replica onto a source
///
/// Removals are applied before transfers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilePlan {
    /// Replica-only paths, ascending
    pub removals: Vec<RelativePath>,

    /// Copies and updates, ascending by path
    pub transfers: Vec<FileAction>,

    /// Aggregate statistics about the plan
    pub stats: PlanStats,
}

impl FilePlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_removal(&mut self, path: RelativePath) {
        self.stats.remove_count += 1;
        self.removals.push(path);
    }

    /// Add a transfer, or count an unchanged file when `action` is `None`
    pub fn add_transfer(&mut self, action: Option<FileAction>) {
        match action {
            Some(action) => {
                match action {
                    FileAction::Copy(_) => self.stats.copy_count += 1,
                    FileAction::Update(_) => self.stats.update_count += 1,
                }
                self.transfers.push(action);
            }
            None => self.stats.unchanged_count += 1,
        }
    }

    /// True when the replica's files already match
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.transfers.is_empty()
    }

    /// Number of file operations the plan will attempt
    pub fn len(&self) -> usize {
        self.removals.len() + self.transfers.len()
    }
}

/// Statistics about a file plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub copy_count: usize,
    pub update_count: usize,
    pub remove_count: usize,
    /// Source files whose replica digest already matches
    pub unchanged_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plan() {
        let plan = FilePlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.stats, PlanStats::default());
    }

    #[test]
    fn test_add_actions_updates_stats() {
        let mut plan = FilePlan::new();
        plan.add_removal(RelativePath::new("stale.txt"));
        plan.add_transfer(Some(FileAction::Copy(RelativePath::new("new.txt"))));
        plan.add_transfer(Some(FileAction::Update(RelativePath::new("changed.txt"))));
        plan.add_transfer(None);

        assert_eq!(plan.stats.remove_count, 1);
        assert_eq!(plan.stats.copy_count, 1);
        assert_eq!(plan.stats.update_count, 1);
        assert_eq!(plan.stats.unchanged_count, 1);
        assert_eq!(plan.len(), 3);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_action_accessors() {
        let copy = FileAction::Copy(RelativePath::new("a.txt"));
        let update = FileAction::Update(RelativePath::new("b.txt"));

        assert!(copy.is_copy());
        assert!(!update.is_copy());
        assert_eq!(copy.op(), SyncOp::CopiedFile);
        assert_eq!(update.op(), SyncOp::UpdatedFile);
        assert_eq!(update.path(), &RelativePath::new("b.txt"));
    }
}
