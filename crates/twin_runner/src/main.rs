//! `ev-twin`: runs the EV convoy digital twin and prints its event log.
//!
//! Event output goes to stdout; diagnostics go to stderr through `tracing`
//! (filter with `RUST_LOG`).

mod cli;
mod sink;

use std::io::BufWriter;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twin_core::runner::run_simulation_with_sink;

use crate::cli::{Args, OutputFormat};
use crate::sink::WriterSink;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    info!(
        vehicles = config.vehicle_count,
        chargers = config.charger_slots,
        horizon_minutes = config.horizon_minutes,
        seed = ?config.seed,
        "configuration loaded"
    );

    let stdout = BufWriter::new(std::io::stdout().lock());
    let mut sink = match args.format {
        OutputFormat::Text => WriterSink::text(stdout),
        OutputFormat::Json => WriterSink::json(stdout),
    };
    let report = run_simulation_with_sink(&config, &mut sink)?;
    sink.finish().context("writing event output")?;

    info!(
        steps = report.steps,
        final_time_ms = report.final_time_ms,
        stranded = report.count("stranded"),
        charged = report.count("charging_completed"),
        "run complete"
    );
    if report.truncated {
        bail!(
            "run stopped after {} events before reaching the {}-minute horizon",
            report.steps,
            config.horizon_minutes
        );
    }
    Ok(())
}
