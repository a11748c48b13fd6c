use anyhow::{bail, Context, Result};
use hsync_reconcile::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, DEFAULT_DESCRIPTION, DEFAULT_YEAR_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TOKEN_ENV: &str = "TEMPO_API_TOKEN";

/// Typed view of the consumed config keys, defaults applied.
///
/// `scheme_id` may be absent here and supplied on the command line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub base_url: String,
    pub scheme_id: Option<String>,
    /// Env var NAME holding the API token.
    pub token_env: String,
    pub timeout_secs: Option<u64>,
    pub country: String,
    pub years: u32,
    pub description: String,
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scheme_id: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: None,
            country: DEFAULT_COUNTRY.to_string(),
            years: DEFAULT_YEAR_COUNT,
            description: DEFAULT_DESCRIPTION.to_string(),
            dry_run: false,
        }
    }
}

impl SyncConfig {
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let d = SyncConfig::default();

        let years = match config.pointer("/sync/years") {
            None | Some(Value::Null) => d.years,
            Some(v) => {
                let n = v
                    .as_u64()
                    .context("CONFIG_INVALID /sync/years: expected a positive integer")?;
                u32::try_from(n).context("CONFIG_INVALID /sync/years: too large")?
            }
        };
        if years == 0 {
            bail!("CONFIG_INVALID /sync/years: must be at least 1");
        }

        let timeout_secs = match config.pointer("/tempo/timeout_secs") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .context("CONFIG_INVALID /tempo/timeout_secs: expected a positive integer")?,
            ),
        };

        let dry_run = match config.pointer("/sync/dry_run") {
            None | Some(Value::Null) => d.dry_run,
            Some(v) => v
                .as_bool()
                .context("CONFIG_INVALID /sync/dry_run: expected true or false")?,
        };

        Ok(SyncConfig {
            base_url: read_str_at(config, "/tempo/base_url").unwrap_or(d.base_url),
            scheme_id: read_scalar_at(config, "/tempo/scheme_id"),
            token_env: read_str_at(config, "/tempo/token_env").unwrap_or(d.token_env),
            timeout_secs,
            country: read_str_at(config, "/sync/country").unwrap_or(d.country),
            years,
            description: read_str_at(config, "/sync/description").unwrap_or(d.description),
            dry_run,
        })
    }
}

/// Non-empty trimmed string at `pointer`.
pub(crate) fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Scheme ids are numeric in Tempo and YAML happily parses `7` as a number.
fn read_scalar_at(config: &Value, pointer: &str) -> Option<String> {
    match config.pointer(pointer)? {
        Value::Number(n) => Some(n.to_string()),
        _ => read_str_at(config, pointer),
    }
}
