use clap::Parser;
use std::process::ExitCode;
use treemirror::commands::schedule;
use treemirror::config::Cli;
use treemirror::{ui, Config};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let _log_guard = ui::logging::init(&config.log_file, config.verbose)?;
    tracing::info!(
        "treemirror v{} mirroring {} -> {} every {}s",
        treemirror::VERSION,
        config.source.display(),
        config.replica.display(),
        config.interval_secs
    );

    let summary = schedule::run(&config);

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
