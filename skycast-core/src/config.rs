use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{model::Units, provider::ServiceId};

/// Credentials for a single external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Unit system used when the command line does not pick one.
    #[serde(default)]
    pub default_units: Units,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,

    /// Overrides for self-hosted proxies and tests.
    pub openweather_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_model: Option<String>,
}

impl Config {
    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Like [`Config::load`], but an unreadable or invalid file yields an empty
    /// default so that `configure` can overwrite it.
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_from_or_default(&Self::config_file_path()?))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\
                 Hint: fix or delete it, or run `skycast configure <service>` to rewrite it.",
                path.display()
            )
        })
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unusable config file");
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key of a service.
    pub fn upsert_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services.insert(id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Stored API key for a service, ignoring the environment.
    pub fn stored_api_key(&self, id: ServiceId) -> Option<&str> {
        self.service_config(id).map(|cfg| cfg.api_key.as_str())
    }

    /// API key for a service; the service's environment variable wins over the file.
    pub fn api_key(&self, id: ServiceId) -> Option<String> {
        self.resolve_api_key(id, std::env::var(id.env_var()).ok())
    }

    pub fn require_api_key(&self, id: ServiceId) -> Result<String> {
        self.api_key(id).ok_or_else(|| missing_key_error(id))
    }

    fn resolve_api_key(&self, id: ServiceId, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.stored_api_key(id).map(str::to_owned))
    }
}

fn missing_key_error(id: ServiceId) -> anyhow::Error {
    anyhow!(
        "No API key configured for service '{id}'.\n\
         Hint: run `skycast configure {id}` or set {}.",
        id.env_var()
    )
}
