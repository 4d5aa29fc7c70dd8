//! Client configuration.
//!
//! Read from `config.toml`; every key is optional. `POSM_BASE_URL` and
//! `POSM_LOG_LEVEL` override the file.

use std::path::Path;
use std::time::Duration;

use posm_core::{Result, SurveyError};
use serde::{Deserialize, Serialize};

pub const ENV_BASE_URL: &str = "POSM_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "POSM_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://posm.example.com`
    pub base_url: String,
    /// Quiet period before an autocomplete query is sent
    pub search_debounce_ms: u64,
    pub min_store_query_len: usize,
    pub min_model_query_len: usize,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            search_debounce_ms: 300,
            min_store_query_len: 2,
            min_model_query_len: 1,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Loads `path`, falling back to defaults when the file is missing or empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).map_err(|e| {
            SurveyError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Loads `path` and applies environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup` (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            tracing::info!("{ENV_BASE_URL} set, overriding base_url");
            self.base_url = url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
