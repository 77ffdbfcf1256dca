//! Core type definitions for treemirror

mod digest;
mod error;
mod event;
mod path;
mod snapshot;

pub use digest::ContentDigest;
pub use error::SyncError;
pub use event::{EventCallback, SyncEvent, SyncOp, SyncOutcome, SyncStats};
pub use path::RelativePath;
pub use snapshot::Snapshot;
