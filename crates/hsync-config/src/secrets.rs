//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only the env var NAME of the Tempo token
//!   (`tempo.token_env`, default `TEMPO_API_TOKEN`).
//! - Callers resolve the token once at startup and pass it into the store.
//! - `Debug` on [`ApiToken`] redacts the value.
//! - Error messages reference the env var NAME, never the value.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::sync::read_str_at;
use crate::DEFAULT_TOKEN_ENV;

/// Tempo API bearer token. **Redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// The raw token, for the HTTP adapter only. Do not log.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(<REDACTED>)")
    }
}

/// Env var name the token is read from.
pub fn token_env_name(config_json: &Value) -> String {
    read_str_at(config_json, "/tempo/token_env").unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string())
}

/// Resolve the token from the process environment.
///
/// # Errors
/// `SECRETS_MISSING` naming the env var when it is unset or blank.
pub fn resolve_api_token(config_json: &Value) -> Result<ApiToken> {
    resolve_api_token_with(config_json, |name| std::env::var(name).ok())
}

/// [`resolve_api_token`] with an explicit environment lookup.
pub fn resolve_api_token_with<F>(config_json: &Value, lookup: F) -> Result<ApiToken>
where
    F: Fn(&str) -> Option<String>,
{
    let name = token_env_name(config_json);
    match lookup(&name) {
        Some(v) if !v.trim().is_empty() => Ok(ApiToken(v.trim().to_string())),
        _ => bail!(
            "SECRETS_MISSING: required env var '{}' (Tempo API token) is not set or empty",
            name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn debug_is_redacted() {
        let t = ApiToken("abc123".to_string());
        assert_eq!(format!("{t:?}"), "ApiToken(<REDACTED>)");
        assert_eq!(t.expose(), "abc123");
    }

    #[test]
    fn default_env_name() {
        assert_eq!(token_env_name(&json!({})), "TEMPO_API_TOKEN");
        assert_eq!(
            token_env_name(&json!({ "tempo": { "token_env": "MY_TOKEN" } })),
            "MY_TOKEN"
        );
    }
}
