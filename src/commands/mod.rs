//! Command layer: one pass, and the loop that repeats it

pub mod schedule;
pub mod sync;
