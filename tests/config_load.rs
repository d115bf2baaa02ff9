//! Integration test: configuration loading, environment overlay and
//! validation.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use meilisearch_mcp::config::{Config, ENV_API_KEY, ENV_LOG_DIR, ENV_URL};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[tokio::test]
async fn sample_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/config.yaml");
    let mut cfg = Config::load(&path)
        .await
        .unwrap_or_else(|e| panic!("config.yaml failed to parse: {e:?}"));

    assert_eq!(cfg.url, "http://localhost:7700");
    assert_eq!(cfg.api_key.as_deref(), Some("$MEILI_MASTER_KEY"));
    assert!(cfg.file_logging);

    cfg.resolve_secrets_from(env(&[(ENV_API_KEY, "from-env")])).unwrap();
    assert_eq!(cfg.api_key.as_deref(), Some("from-env"));
    cfg.validate().unwrap();
}

// ── deny_unknown_fields validation ──────────────────────────

#[tokio::test]
async fn unknown_top_level_field_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "url: http://meili:7700\nindex_prefix: x\n").unwrap();

    let result = Config::load(&path).await;
    let err_msg = format!("{:?}", result.unwrap_err());
    assert!(
        err_msg.contains("unknown field") || err_msg.contains("index_prefix"),
        "error should mention the unknown field, got: {err_msg}"
    );
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&dir.path().join("config.yaml")).await;
    let err_msg = format!("{:?}", result.unwrap_err());
    assert!(err_msg.contains("failed to read config file"), "got: {err_msg}");
}

// ── environment overlay ─────────────────────────────────────

#[tokio::test]
async fn environment_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "url: http://file:7700\napi_key: file-key\n").unwrap();

    let mut cfg = Config::load(&path).await.unwrap();
    cfg.apply_env_from(env(&[
        (ENV_URL, "http://env:7700"),
        (ENV_LOG_DIR, "/tmp/meili-logs"),
    ]));

    assert_eq!(cfg.url, "http://env:7700");
    assert_eq!(cfg.api_key.as_deref(), Some("file-key"));
    assert_eq!(cfg.resolved_log_dir(), Path::new("/tmp/meili-logs"));
}

#[test]
fn empty_environment_values_are_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env_from(env(&[(ENV_URL, ""), (ENV_API_KEY, "  ")]));
    assert_eq!(cfg.url, "http://localhost:7700");
    assert_eq!(cfg.api_key, None);
}

// ── secrets and validation ──────────────────────────────────

#[test]
fn unset_secret_reference_fails() {
    let mut cfg = Config {
        api_key: Some("$NOT_THERE".into()),
        ..Config::default()
    };
    let err = cfg.resolve_secrets_from(env(&[])).unwrap_err();
    assert!(err.to_string().contains("NOT_THERE"));
}

#[test]
fn literal_key_is_left_alone() {
    let mut cfg = Config {
        api_key: Some("plain-key".into()),
        ..Config::default()
    };
    cfg.resolve_secrets_from(env(&[])).unwrap();
    assert_eq!(cfg.api_key.as_deref(), Some("plain-key"));
}

#[test]
fn validation_rejects_bad_values() {
    let bad_url = Config {
        url: "ftp://meili:7700".into(),
        ..Config::default()
    };
    assert!(bad_url.validate().is_err());

    let zero_buffer = Config {
        log_buffer: 0,
        ..Config::default()
    };
    assert!(zero_buffer.validate().is_err());

    let zero_timeout = Config {
        request_timeout_secs: 0,
        ..Config::default()
    };
    assert!(zero_timeout.validate().is_err());
}

#[test]
fn coordinates_carry_url_and_key() {
    let cfg = Config {
        url: "http://meili:7700".into(),
        api_key: Some("k".into()),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let coords = cfg.coordinates();
    assert_eq!(coords.url, "http://meili:7700");
    assert_eq!(coords.api_key.as_deref(), Some("k"));
    assert_eq!(cfg.request_timeout(), Duration::from_secs(5));
}
