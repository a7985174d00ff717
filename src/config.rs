//! Runtime configuration.
//!
//! Layers, lowest first: built-in defaults, `~/.skycast/config.json` (or an
//! explicit path), `SKYCAST_*` environment variables. The CLI applies its own
//! flags on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::weather::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::weather::orchestrator::DEFAULT_API_KEY_VAR;
use crate::weather::{ApiKeySource, GeminiClient, HttpWeatherSource, WeatherOrchestrator};

pub const DEFAULT_PRIMARY_URL: &str =
    "https://mytestfunctionappsg123.azurewebsites.net/api/httptrigger";

/// Cold starts on the primary provider can take several seconds.
pub const DEFAULT_PRIMARY_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the primary weather endpoint.
    pub primary_url: String,
    pub primary_timeout_secs: u64,
    /// Base URL of the completion service.
    pub completion_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Fixed API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Upper bound on the completion call. None leaves it unbounded.
    pub completion_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            primary_timeout_secs: DEFAULT_PRIMARY_TIMEOUT_SECS,
            completion_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_VAR.to_string(),
            api_key: None,
            completion_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when it exists.
    /// Environment overrides are applied in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load_from(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skycast")
            .join("config.json")
    }

    /// Apply `SKYCAST_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SKYCAST_PRIMARY_URL") {
            self.primary_url = url;
        }
        if let Some(secs) = lookup("SKYCAST_PRIMARY_TIMEOUT_SECS") {
            self.primary_timeout_secs = secs.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("SKYCAST_PRIMARY_TIMEOUT_SECS='{}' is not a number", secs))
            })?;
        }
        if let Some(url) = lookup("SKYCAST_COMPLETION_URL") {
            self.completion_url = url;
        }
        if let Some(model) = lookup("SKYCAST_MODEL") {
            self.model = model;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_url.trim().is_empty() {
            return Err(ConfigError::Invalid("primary_url must not be empty".into()));
        }
        if self.completion_url.trim().is_empty() {
            return Err(ConfigError::Invalid("completion_url must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if self.primary_timeout_secs == 0 {
            return Err(ConfigError::Invalid("primary_timeout_secs must be positive".into()));
        }
        if self.completion_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("completion_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn api_key_source(&self) -> ApiKeySource {
        match &self.api_key {
            Some(key) => ApiKeySource::Static(key.clone()),
            None => ApiKeySource::Env(self.api_key_env.clone()),
        }
    }

    /// Wire the HTTP primary endpoint and the Gemini client.
    pub fn build_orchestrator(&self) -> Result<WeatherOrchestrator, ConfigError> {
        self.validate()?;
        let source = HttpWeatherSource::new(
            self.primary_url.clone(),
            Duration::from_secs(self.primary_timeout_secs),
        );
        let completion = GeminiClient::new(self.completion_url.clone())
            .with_timeout(self.completion_timeout_secs.map(Duration::from_secs));
        Ok(WeatherOrchestrator::new(source, completion, self.api_key_source())
            .with_model(self.model.clone()))
    }
}
