//! Turns pass results into log lines

use crate::types::{SyncError, SyncEvent, SyncOutcome};
use tracing::{debug, error, info, Level};

/// Render one event as the (level, message) pair it is logged with
pub fn format_event(event: &SyncEvent) -> (Level, String) {
    match event {
        SyncEvent::Applied { op, path } => (Level::INFO, format!("{}: {}", op.label(), path)),
        SyncEvent::Failed { op, path, error } => (
            Level::ERROR,
            format!("Failed to {} {}: {}", op.verb(), path, error),
        ),
    }
}

/// Log one event. Usable directly as the orchestrator's event callback.
pub fn report_event(event: &SyncEvent) {
    let (level, message) = format_event(event);
    if level == Level::ERROR {
        error!("{message}");
    } else {
        info!("{message}");
    }
}

/// Log the end of a pass that ran to completion.
pub fn report_outcome(outcome: &SyncOutcome) {
    if outcome.is_noop() {
        debug!("Replica already up to date ({:.2?})", outcome.duration);
        return;
    }

    let summary = outcome.summary();
    if outcome.has_failures() {
        error!("Pass finished with failures - {summary}");
    } else {
        info!("Pass finished - {summary}");
    }
}

/// Log a pass that could not run at all.
pub fn report_pass_error(error: &SyncError) {
    error!("Error during synchronization: {error}");
}
