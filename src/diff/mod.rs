//! Diff engine - Snapshot comparison and plan generation

mod compare;
mod engine;
mod plan;

pub use compare::compare_digests;
pub use engine::{FileAction, FilePlan, PlanStats};
pub use plan::plan_files;
