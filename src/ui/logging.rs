//! Log sink setup: stdout plus an append-only log file

use crate::types::SyncError;
use chrono::Local;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Keeps the background log-file writer alive; flushes it on drop.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// `2024-05-01 12:00:00,123 - INFO - Copied: a.txt`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber.
///
/// Every line goes to stdout and is appended to `log_file` (created, with
/// its parent folders, when missing). `verbose` lowers the default level from
/// INFO to DEBUG; `RUST_LOG` overrides both.
pub fn init(log_file: &Path, verbose: bool) -> Result<LogGuard, SyncError> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(SyncError::io_at(parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(SyncError::io_at(log_file))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stdout);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SyncError::Config(format!("logging already initialized: {e}")))?;

    Ok(LogGuard { _guard: guard })
}
