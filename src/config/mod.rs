//! Configuration management

use super::types::SyncError;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Mirror SOURCE into REPLICA every INTERVAL seconds
#[derive(Parser, Debug, Clone)]
#[command(name = "treemirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to mirror from (read-only)
    pub source: PathBuf,

    /// Folder kept identical to SOURCE
    pub replica: PathBuf,

    /// Seconds between the end of one pass and the start of the next
    pub interval: u64,

    /// File every log line is appended to
    pub log_file: PathBuf,

    /// Run a single pass and exit (status 1 if anything failed)
    #[arg(long)]
    pub once: bool,

    /// Also log skipped entries and snapshot sizes
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Replica directory
    pub replica: PathBuf,

    /// Pause between passes, in seconds
    pub interval_secs: u64,

    /// Log file (append mode)
    pub log_file: PathBuf,

    /// Stop after one pass?
    pub once: bool,

    /// Debug-level logging?
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            replica: PathBuf::new(),
            interval_secs: 60,
            log_file: PathBuf::from("treemirror.log"),
            once: false,
            verbose: false,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Self {
            source: cli.source,
            replica: cli.replica,
            interval_secs: cli.interval,
            log_file: cli.log_file,
            once: cli.once,
            verbose: cli.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    ///
    /// The source is allowed to be missing: that is reported on every pass
    /// until it shows up.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.interval_secs == 0 {
            return Err(SyncError::Config(
                "Interval must be at least 1 second".to_string(),
            ));
        }

        let source = resolve(&self.source)?;
        let replica = resolve(&self.replica)?;

        if source == replica {
            return Err(SyncError::Config(
                "Source and replica cannot be the same".to_string(),
            ));
        }
        if replica.starts_with(&source) {
            return Err(SyncError::Config(format!(
                "Replica {:?} is inside source {:?}",
                self.replica, self.source
            )));
        }
        if source.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Source {:?} is inside replica {:?}",
                self.source, self.replica
            )));
        }

        let log_file = resolve(&self.log_file)?;
        for (root, name) in [(&source, "source"), (&replica, "replica")] {
            if log_file.starts_with(root) {
                return Err(SyncError::Config(format!(
                    "Log file {:?} is inside {name} {root:?}",
                    self.log_file
                )));
            }
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Absolute form of `path` with its longest existing prefix canonicalized.
///
/// Symlinked parents resolve the same way whether or not the final
/// components exist yet.
fn resolve(path: &Path) -> Result<PathBuf, SyncError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| SyncError::Config(format!("Cannot read current directory: {e}")))?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing
                .iter()
                .rev()
                .fold(canonical, |resolved, part| resolved.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    Ok(absolute)
}
