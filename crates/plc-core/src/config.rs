//! API configuration management.
//!
//! This module holds the plain configuration record that every outbound
//! request is built from: the backend base URL, the API namespace, and the
//! name of the persistent slot that carries the session credential.
//!
//! Configuration is stored at `~/.config/plc-client/config.json` and may be
//! overridden per process with `PLC_BASE_URL` and `PLC_API_NAMESPACE`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "plc-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production backend
pub const DEFAULT_BASE_URL: &str = "https://plc-synchronize.herokuapp.com";

pub const DEFAULT_API_NAMESPACE: &str = "/api/v1";

/// Key of the persistent slot holding the raw credential.
/// Also the query parameter name carrying a credential in a magic link.
pub const CREDENTIAL_KEY: &str = "plcJwt";

const ENV_BASE_URL: &str = "PLC_BASE_URL";
const ENV_API_NAMESPACE: &str = "PLC_API_NAMESPACE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_namespace: String,
    pub storage_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_namespace: DEFAULT_API_NAMESPACE.to_string(),
            storage_key: CREDENTIAL_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    /// Configuration pointing at an arbitrary backend, default namespace.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Ok(path) => Self::load_from(&path)?,
            Err(_) => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded API config");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
        if let Some(namespace) = lookup(ENV_API_NAMESPACE) {
            self.api_namespace = namespace;
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the file-backed credential slot.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Absolute URL of an endpoint below the API namespace.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let namespace = self.api_namespace.trim_matches('/');
        let path = path.trim_start_matches('/');
        if namespace.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, namespace, path)
        }
    }

    /// Authorization header value for a credential.
    pub fn generate_auth_header(&self, token: &str) -> String {
        format!("Bearer {}", token)
    }
}
