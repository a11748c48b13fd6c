use anyhow::{bail, Result};
use clap::Parser;
use hsync_reconcile::{DEFAULT_COUNTRY, DEFAULT_YEAR_COUNT};

mod commands;

use commands::sync::{run_sync, SyncArgs};

#[derive(Parser)]
#[command(name = "hsync")]
#[command(about = "Sync national holidays into a Tempo holiday scheme", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> local overrides)
    #[arg(long = "config")]
    config_paths: Vec<String>,

    /// Tempo holiday scheme id (overrides tempo.scheme_id)
    #[arg(long)]
    scheme_id: Option<String>,

    /// ISO 3166-1 alpha-2 country code (overrides sync.country)
    #[arg(long, long_help = format!("ISO 3166-1 alpha-2 country code. Overrides sync.country [default: {DEFAULT_COUNTRY}]"))]
    country: Option<String>,

    /// Number of years to sync, starting with the current one (overrides sync.years)
    #[arg(long, long_help = format!("Number of years to sync, starting with the current one. Overrides sync.years [default: {DEFAULT_YEAR_COUNT}]"))]
    years: Option<u32>,

    /// Read and classify only; create nothing
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let result = run_sync(SyncArgs {
        config_paths: cli.config_paths,
        scheme_id: cli.scheme_id,
        country: cli.country,
        years: cli.years,
        dry_run: cli.dry_run,
    })?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_clean() {
        bail!(
            "{} holiday(s) were refused by the store; see \"failed\" above",
            result.failed.len()
        );
    }
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
