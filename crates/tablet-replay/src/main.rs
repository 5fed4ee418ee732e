use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

mod trace;

/// Replay a recorded tablet event trace.
///
/// Runs every event through the tablet input core against a simulated
/// seat and prints the tablet protocol signals it emits.
#[derive(Parser, Debug)]
#[command(name = "tablet-replay", version, about)]
struct Cli {
    /// Trace file (TOML with a `[scene]` table and `[[events]]`).
    trace: PathBuf,

    /// Path to configuration file (TOML).
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print one JSON object per signal instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = tablet_config::load(cli.config.as_deref())?;
    let trace = trace::load(&cli.trace)?;

    tracing::info!(
        trace = %cli.trace.display(),
        events = trace.events.len(),
        surfaces = trace.scene.surfaces.len(),
        "Replaying trace"
    );

    let steps = trace::replay(trace, config.profile());

    let mut out = std::io::stdout().lock();
    for step in &steps {
        if cli.json {
            let line = serde_json::to_string(step).context("failed to serialize signal")?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{step}")?;
        }
    }

    tracing::info!(signals = steps.len(), "Replay finished");
    Ok(())
}
