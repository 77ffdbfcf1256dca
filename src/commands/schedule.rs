//! Fixed-interval scheduler around the reconciliation pass

use crate::commands::sync::reconcile_with;
use crate::ui::{report_event, report_outcome, report_pass_error};
use crate::Config;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Tally of the passes a schedule ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub passes: u64,
    /// Passes that failed outright or recorded at least one path failure
    pub failed_passes: u64,
    /// Path-level failures across all passes
    pub path_failures: usize,
}

impl ScheduleSummary {
    pub fn is_clean(&self) -> bool {
        self.failed_passes == 0
    }
}

/// Run a pass now, then one every `config.interval()`.
///
/// Never returns unless `config.once` is set. A failing pass is logged and
/// the next one still happens on schedule.
pub fn run(config: &Config) -> ScheduleSummary {
    let max_passes = if config.once { Some(1) } else { None };
    run_with(config, max_passes, thread::sleep)
}

/// Scheduler loop with an explicit pass limit and sleep function.
///
/// The interval is measured from the end of one pass to the start of the
/// next, so passes never overlap.
pub fn run_with(
    config: &Config,
    max_passes: Option<u64>,
    mut sleep: impl FnMut(Duration),
) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();

    loop {
        run_pass(config, &mut summary);
        if max_passes.is_some_and(|max| summary.passes >= max) {
            return summary;
        }
        sleep(config.interval());
    }
}

fn run_pass(config: &Config, summary: &mut ScheduleSummary) {
    summary.passes += 1;
    info!(
        "Synchronizing {} -> {} (pass {})",
        config.source.display(),
        config.replica.display(),
        summary.passes
    );

    match reconcile_with(&config.source, &config.replica, Some(&report_event)) {
        Ok(outcome) => {
            if outcome.has_failures() {
                summary.failed_passes += 1;
                summary.path_failures += outcome.stats.failures;
            }
            report_outcome(&outcome);
        }
        Err(error) => {
            summary.failed_passes += 1;
            report_pass_error(&error);
        }
    }
}
