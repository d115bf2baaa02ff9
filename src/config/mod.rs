use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::client::{Coordinates, DEFAULT_URL};

/// Environment variable holding the Meilisearch base URL.
pub const ENV_URL: &str = "MEILI_HTTP_ADDR";
/// Environment variable holding the Meilisearch API key.
pub const ENV_API_KEY: &str = "MEILI_MASTER_KEY";
/// Environment variable overriding the log directory.
pub const ENV_LOG_DIR: &str = "MEILI_MCP_LOG_DIR";

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_buffer() -> usize {
    crate::logs::DEFAULT_BUFFER
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Server configuration, optionally loaded from `config.yaml`.
///
/// Resolution order, later wins: defaults, YAML file, environment,
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Meilisearch base URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// API key (plain text or env-var reference like `$MEILI_MASTER_KEY`).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Directory for daily log files.  Defaults to `<home>/logs`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Persist structured log records to disk.
    #[serde(default = "default_true")]
    pub file_logging: bool,
    /// Capacity of the log queue; records beyond it are dropped.
    #[serde(default = "default_log_buffer")]
    pub log_buffer: usize,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            log_dir: None,
            file_logging: true,
            log_buffer: default_log_buffer(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Read and parse a YAML configuration file.
    pub async fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            serde_yaml_ng::from_str(&contents).context("failed to parse config YAML")?;
        tracing::debug!(path = %path.display(), url = %config.url, "configuration loaded");
        Ok(config)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay values from `lookup`; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_URL) {
            self.url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Replace a `$NAME` api key with the value of variable `NAME`.
    pub fn resolve_secrets(&mut self) -> anyhow::Result<()> {
        self.resolve_secrets_from(|name| std::env::var(name).ok())
    }

    pub fn resolve_secrets_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = self.api_key.as_deref().and_then(|k| k.strip_prefix('$')) {
            let value = lookup(name).filter(|v| !v.is_empty()).with_context(|| {
                format!("config: api_key references unset environment variable {name}")
            })?;
            self.api_key = Some(value);
        }
        Ok(())
    }

    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.coordinates()
            .parsed_url()
            .context("config: invalid url")?;
        if self.log_buffer == 0 {
            anyhow::bail!("config: log_buffer must be greater than 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("config: request_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.url.clone(), self.api_key.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured log directory, or `<home>/logs`.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| crate::meili_home().join("logs"))
    }
}
