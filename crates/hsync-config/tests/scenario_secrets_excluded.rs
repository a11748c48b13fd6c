//! The token lives in the environment. YAML holding something that looks like
//! a real token is refused, and errors never echo it.

use hsync_config::load_layered_yaml_from_strings;
use hsync_config::secrets::{resolve_api_token, resolve_api_token_with};

#[test]
fn literal_token_in_yaml_is_refused() {
    let yaml = r#"
tempo:
  token_env: "Bearer abcdefghijklmnop"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_SECRET_DETECTED"), "{msg}");
    assert!(msg.contains("/tempo/token_env"), "{msg}");
    assert!(!msg.contains("abcdefghijklmnop"), "error leaked the value: {msg}");
}

#[test]
fn token_resolves_from_named_env_var() {
    let cfg = load_layered_yaml_from_strings(&["tempo:\n  token_env: HSYNC_TEST_TOKEN\n"])
        .unwrap()
        .config_json;

    let token = resolve_api_token_with(&cfg, |name| {
        (name == "HSYNC_TEST_TOKEN").then(|| "  tok-123  ".to_string())
    })
    .unwrap();
    assert_eq!(token.expose(), "tok-123");
    assert!(!format!("{token:?}").contains("tok-123"));
}

#[test]
fn missing_token_names_the_variable_only() {
    // Sentinel name: never set in any CI or dev environment.
    let cfg = load_layered_yaml_from_strings(&[
        "tempo:\n  token_env: HSYNC_SENTINEL_TOKEN_MISSING_Z9\n",
    ])
    .unwrap()
    .config_json;

    let err = resolve_api_token(&cfg).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("SECRETS_MISSING"), "{msg}");
    assert!(msg.contains("HSYNC_SENTINEL_TOKEN_MISSING_Z9"), "{msg}");
}

#[test]
fn blank_token_counts_as_missing() {
    let cfg = serde_json::json!({});
    assert!(resolve_api_token_with(&cfg, |_| Some("   ".to_string())).is_err());
}
