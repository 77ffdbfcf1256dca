//! Directory scanning logic

mod walker;

pub use walker::{list_folders, snapshot_tree};
