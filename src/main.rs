//! Batch driver: load snapshots, conflate, write the report.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use addr_conflate::services::conflate::snapshot::{
    read_json, RegionalThresholds, Registry, TargetSnapshot,
};
use addr_conflate::services::output::write_report;
use addr_conflate::{conflate, ConflateError, ConflationConfig, Status};

#[derive(Parser, Debug)]
#[command(name = "addr-conflate")]
#[command(about = "Reconcile an address registry with a crowd-sourced map")]
#[command(version)]
struct Args {
    /// Registry snapshot (JSON object keyed by registry ID)
    #[arg(long)]
    registry: PathBuf,

    /// Target snapshot (linz / duplicate_linz_ids / semi / no_ref)
    #[arg(long)]
    target: PathBuf,

    /// Regional stacking thresholds
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable the superseded-by-building check
    #[arg(long)]
    slow: bool,

    /// Use the test stacking threshold
    #[arg(long)]
    test_mode: bool,

    /// Report destination
    #[arg(long)]
    out: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        if let Some(ConflateError::MalformedStackId { id, status }) =
            e.downcast_ref::<ConflateError>()
        {
            log::error!("Aborted on record {id} ({status}); no report written");
        }
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConflationConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConflationConfig::default(),
    };
    config.slow_mode |= args.slow;
    config.test_mode |= args.test_mode;

    let registry: Registry = read_json(&args.registry, "registry")
        .with_context(|| format!("Failed to load registry {}", args.registry.display()))?;
    let target: TargetSnapshot = read_json(&args.target, "target snapshot")
        .with_context(|| format!("Failed to load target {}", args.target.display()))?;
    let regions = match &args.regions {
        Some(path) => {
            let regions = RegionalThresholds::load(path)
                .with_context(|| format!("Failed to load regions {}", path.display()))?;
            log::info!("Loaded {} regional thresholds", regions.regions.len());
            regions
        }
        None => RegionalThresholds::default(),
    };

    let report = conflate(&registry, &target, &regions, &config)?;

    for status in Status::ALL {
        let count = report.count(status);
        if count > 0 {
            log::info!("{status}: {count}");
        }
    }

    write_report(&report, &args.out)
        .with_context(|| format!("Failed to write report {}", args.out.display()))?;
    log::info!("Report written to {}", args.out.display());
    Ok(())
}
