//! Reporting: log setup and event rendering

pub mod logging;
pub mod report;

pub use logging::LogGuard;
pub use report::{format_event, report_event, report_outcome, report_pass_error};
