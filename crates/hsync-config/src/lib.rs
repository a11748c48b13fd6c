//! hsync-config
//!
//! Layered YAML configuration for the holiday sync:
//! - later layers override earlier ones (deep merge of mappings)
//! - token-looking literals are refused; YAML carries env var NAMES only
//! - keys the sync never reads are reported (warn) or refused (fail)

pub mod secrets;
mod sync;

pub use sync::{SyncConfig, DEFAULT_TOKEN_ENV};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

/// Sections and the keys read from each. Anything else is unused.
///
/// Keep this in step with `SyncConfig::from_config_json` and `secrets`.
pub const CONSUMED_KEYS: &[(&str, &[&str])] = &[
    ("tempo", &["base_url", "scheme_id", "token_env", "timeout_secs"]),
    ("sync", &["country", "years", "description", "dry_run"]),
];

/// Credential shapes that must never sit in a config file.
const TOKEN_PREFIXES: &[&str] = &["Bearer ", "Basic ", "ATATT", "eyJ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Leaf pointers nobody reads, sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Compare the merged config against [`CONSUMED_KEYS`].
/// `Fail` errors when unused keys exist; `Warn` always returns the report.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut unused: Vec<String> = Vec::new();

    match config_json {
        Value::Object(root) => {
            for (section, body) in root {
                let known = CONSUMED_KEYS
                    .iter()
                    .find(|(name, _)| *name == section.as_str())
                    .map(|(_, keys)| *keys);
                match (known, body) {
                    (Some(keys), Value::Object(entries)) => {
                        for (key, value) in entries {
                            if !keys.contains(&key.as_str()) {
                                leaves(value, &format!("/{section}/{key}"), &mut unused);
                            }
                        }
                    }
                    _ => leaves(body, &format!("/{section}"), &mut unused),
                }
            }
        }
        Value::Null => {}
        other => leaves(other, "", &mut unused),
    }
    unused.sort();

    let report = UnusedKeyReport {
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config key(s); remove them or fix the spelling: {}",
            report.unused_leaf_pointers.len(),
            report.unused_leaf_pointers.join(", ")
        );
    }

    Ok(report)
}

fn leaves(v: &Value, at: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map {
                leaves(vv, &format!("{at}/{k}"), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, vv) in items.iter().enumerate() {
                leaves(vv, &format!("{at}/{i}"), out);
            }
        }
        _ => out.push(if at.is_empty() { "/".to_string() } else { at.to_string() }),
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Number of YAML documents merged.
    pub layers: usize,
    pub config_json: Value,
}

/// Read and merge YAML files in order (base first, overrides last).
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<String>>>()?;

    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Default::default());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let layer = serde_json::to_value(yaml).context("yaml->json conversion failed")?;
        merge_into(&mut merged, layer);
    }

    reject_token_literals(&merged, "")?;

    Ok(LoadedConfig {
        layers: yaml_docs.len(),
        config_json: merged,
    })
}

/// Mappings merge key by key; any other value replaces. An empty layer
/// (YAML null) changes nothing.
fn merge_into(base: &mut Value, layer: Value) {
    match (base, layer) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (k, v) in layer_map {
                merge_into(base_map.entry(k).or_insert(Value::Null), v);
            }
        }
        (slot, other) => *slot = other,
    }
}

fn reject_token_literals(v: &Value, at: &str) -> Result<()> {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                reject_token_literals(vv, &format!("{at}/{k}"))?;
            }
        }
        Value::Array(items) => {
            for (i, vv) in items.iter().enumerate() {
                reject_token_literals(vv, &format!("{at}/{i}"))?;
            }
        }
        Value::String(s) if looks_like_token(s) => {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", at);
        }
        _ => {}
    }
    Ok(())
}

fn looks_like_token(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && TOKEN_PREFIXES.iter().any(|p| t.starts_with(p))
}
