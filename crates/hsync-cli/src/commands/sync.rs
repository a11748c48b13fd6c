//! The one thing the binary does: load config, resolve the token, reconcile.

use std::time::Duration;

use anyhow::{Context, Result};
use hsync_calendar::{Country, NationalCalendar};
use hsync_config::{
    load_layered_yaml, load_layered_yaml_from_strings, report_unused_keys, secrets, SyncConfig,
    UnusedKeyPolicy,
};
use hsync_reconcile::{reconcile_with, ReconcileSettings, ReconciliationResult};
use hsync_store::TempoHolidayStore;
use tracing::{info, warn};

/// Command-line overrides; `None` / `false` defers to config.
#[derive(Debug, Default)]
pub struct SyncArgs {
    pub config_paths: Vec<String>,
    pub scheme_id: Option<String>,
    pub country: Option<String>,
    pub years: Option<u32>,
    pub dry_run: bool,
}

pub fn run_sync(args: SyncArgs) -> Result<ReconciliationResult> {
    let loaded = if args.config_paths.is_empty() {
        load_layered_yaml_from_strings(&[])?
    } else {
        let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
        load_layered_yaml(&path_refs)?
    };
    info!(layers = loaded.layers, "config loaded");

    let unused = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for p in &unused.unused_leaf_pointers {
        warn!(pointer = %p, "unused config key");
    }

    let sync = apply_overrides(SyncConfig::from_config_json(&loaded.config_json)?, &args);

    // Validate everything local before touching the environment or network.
    Country::parse(&sync.country)?;
    let scheme_id = sync
        .scheme_id
        .clone()
        .context("CONFIG_MISSING: holiday scheme id; set tempo.scheme_id or pass --scheme-id")?;
    let token = secrets::resolve_api_token(&loaded.config_json)?;

    let store = TempoHolidayStore::builder(token.expose(), scheme_id)
        .base_url(sync.base_url.clone())
        .timeout(sync.timeout_secs.map(Duration::from_secs))
        .build()?;

    let settings = ReconcileSettings {
        description: sync.description.clone(),
        dry_run: sync.dry_run,
    };

    let result = reconcile_with(store, NationalCalendar::new(), settings, &sync.country, sync.years)?;

    info!(
        added = result.added.len(),
        existing = result.existing.len(),
        failed = result.failed.len(),
        dry_run = result.dry_run,
        "sync finished"
    );
    Ok(result)
}

fn apply_overrides(mut sync: SyncConfig, args: &SyncArgs) -> SyncConfig {
    if let Some(s) = &args.scheme_id {
        sync.scheme_id = Some(s.trim().to_string());
    }
    if let Some(c) = &args.country {
        sync.country = c.trim().to_string();
    }
    if let Some(y) = args.years {
        sync.years = y;
    }
    if args.dry_run {
        sync.dry_run = true;
    }
    sync
}
