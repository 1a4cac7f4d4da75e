use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const ENV_BASE_URL: &str = "AGENT_ADMIN_BASE_URL";
pub const ENV_TOKEN: &str = "AGENT_ADMIN_TOKEN";

/// Console settings, read from `<config_dir>/agent-admin/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_loading_grace_ms")]
    pub loading_grace_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5001/api/v1".into()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_page_size() -> u32 {
    12
}
fn default_search_debounce_ms() -> u64 {
    500
}
fn default_loading_grace_ms() -> u64 {
    200
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            default_page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            loading_grace_ms: default_loading_grace_ms(),
        }
    }
}

impl AdminConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn loading_grace(&self) -> Duration {
        Duration::from_millis(self.loading_grace_ms)
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> AppResult<Self> {
        Self::load_from(default_config_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// Read `path` when it exists (defaults otherwise), apply overrides from
    /// `lookup`, then validate.
    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => {
                log::debug!("[Config] No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Invalid config file {:?}: {e}", path)))?;
        log::info!("[Config] Loaded config from {:?}", path);
        Ok(config)
    }

    /// Overrides are looked up through `lookup` so tests don't have to touch the
    /// process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token.trim().to_string());
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.default_page_size == 0 {
            return Err(AppError::Config("default_page_size must be positive".into()));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agent-admin").join("config.json"))
}
