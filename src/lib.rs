//! # treemirror - One-way Periodic Directory Mirroring
//!
//! Keeps a replica folder byte-identical to a source folder.
//!
//! Each pass snapshots both trees into content digests, removes what the
//! source no longer has, copies and updates what differs, then aligns the
//! folder structure. Failures on single paths are recorded and the pass
//! carries on.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{ContentDigest, RelativePath, Snapshot, SyncError, SyncEvent, SyncOp, SyncOutcome};
pub use config::Config;
pub use commands::sync::{reconcile, reconcile_with};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
