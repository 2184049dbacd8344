//! Client configuration.
//!
//! Values are layered in a fixed order: built-in defaults, then a JSON
//! config file, then `CBRIEF_BASE_URL`, then command-line flags. The result
//! is validated once before any request is made.
use crate::workflow::DriverSettings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV: &str = "CBRIEF_BASE_URL";
const CONFIG_DIR_NAME: &str = "cbrief";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub stage_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub results_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = DriverSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stage_delay_ms: settings.stage_delay.as_millis() as u64,
            settle_delay_ms: settings.settle_delay.as_millis() as u64,
            results_retries: settings.results_retries,
        }
    }
}

impl ClientConfig {
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            stage_delay: Duration::from_millis(self.stage_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            results_retries: self.results_retries,
        }
    }
}

/// Values supplied on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub stage_delay_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
}

/// `<config_dir>/cbrief/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a config file; absent fields take their defaults.
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ClientConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Resolve the effective config from the process environment.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ClientConfig> {
    let env_base_url = env::var(BASE_URL_ENV).ok();
    resolve_config_with(
        overrides,
        default_config_path().as_deref(),
        env_base_url.as_deref(),
    )
}

/// Layer defaults, file, environment and flags, then validate.
///
/// An explicit `--config` path must exist; the default path is only read
/// when present.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    default_path: Option<&Path>,
    env_base_url: Option<&str>,
) -> Result<ClientConfig> {
    let mut config = match (&overrides.config_path, default_path) {
        (Some(path), _) => load_config(path)?,
        (None, Some(path)) if path.is_file() => load_config(path)?,
        _ => ClientConfig::default(),
    };

    if let Some(base_url) = env_base_url.filter(|value| !value.trim().is_empty()) {
        config.base_url = base_url.to_string();
    }
    if let Some(base_url) = &overrides.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(delay) = overrides.stage_delay_ms {
        config.stage_delay_ms = delay;
    }
    if let Some(delay) = overrides.settle_delay_ms {
        config.settle_delay_ms = delay;
    }

    config.base_url = normalize_base_url(&config.base_url);
    validate_config(&config)?;
    tracing::debug!(base_url = %config.base_url, "resolved client config");
    Ok(config)
}

pub fn validate_config(config: &ClientConfig) -> Result<()> {
    let base_url = config.base_url.as_str();
    let rest = base_url
        .strip_prefix("http://")
        .or_else(|| base_url.strip_prefix("https://"))
        .ok_or_else(|| anyhow!("base_url must start with http:// or https://: {base_url}"))?;
    if rest.is_empty() {
        return Err(anyhow!("base_url is missing a host: {base_url}"));
    }
    Ok(())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
