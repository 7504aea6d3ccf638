//! Service configuration, loaded from TOML with environment overrides.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5002
//!
//! [search]
//! per_source_limit = 10
//! timeout_seconds = 10
//!
//! [credentials]
//! pexels_api_key = "..."
//! ```
//!
//! Every section and field is optional. API keys may instead come from
//! `PEXELS_API_KEY`, `PIXABAY_API_KEY` and `UNSPLASH_API_KEY`, which win
//! over the file when set and non-empty.

use std::fmt;
use std::path::{Path, PathBuf};

use montage_search::config::{
    PEXELS_ENDPOINT, PIXABAY_ENDPOINT, UNSPLASH_ENDPOINT, WIKIPEDIA_ENDPOINT,
};
use montage_search::{ProviderCredentials, ProviderEndpoints, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Environment variable holding the Pexels API key.
pub const PEXELS_KEY_VAR: &str = "PEXELS_API_KEY";
/// Environment variable holding the Pixabay API key.
pub const PIXABAY_KEY_VAR: &str = "PIXABAY_API_KEY";
/// Environment variable holding the Unsplash access key.
pub const UNSPLASH_KEY_VAR: &str = "UNSPLASH_API_KEY";

/// Top-level configuration for the montage service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MontageConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Aggregation settings.
    pub search: SearchSettings,
    /// Provider API keys.
    pub credentials: CredentialsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5002,
        }
    }
}

/// Aggregation settings, mirrored into [`SearchConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results requested from each provider when a request omits `per_page`.
    pub per_source_limit: usize,
    /// Timeout for each outbound provider request, in seconds.
    pub timeout_seconds: u64,
    /// Optional overall deadline per search, in seconds.
    pub request_deadline_seconds: Option<u64>,
    /// User-Agent override. The library default is used when unset.
    pub user_agent: Option<String>,
    /// Provider endpoint overrides.
    pub endpoints: EndpointSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            per_source_limit: defaults.per_source_limit,
            timeout_seconds: defaults.timeout_seconds,
            request_deadline_seconds: defaults.request_deadline_seconds,
            user_agent: None,
            endpoints: EndpointSettings::default(),
        }
    }
}

/// Provider endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub pexels: String,
    pub pixabay: String,
    pub unsplash: String,
    pub wikipedia: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            pexels: PEXELS_ENDPOINT.to_owned(),
            pixabay: PIXABAY_ENDPOINT.to_owned(),
            unsplash: UNSPLASH_ENDPOINT.to_owned(),
            wikipedia: WIKIPEDIA_ENDPOINT.to_owned(),
        }
    }
}

/// Provider API keys. Missing keys are left empty and the provider simply
/// contributes nothing.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub pexels_api_key: String,
    pub pixabay_api_key: String,
    pub unsplash_api_key: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |key: &str| if key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("CredentialsConfig")
            .field("pexels_api_key", &state(&self.pexels_api_key))
            .field("pixabay_api_key", &state(&self.pixabay_api_key))
            .field("unsplash_api_key", &state(&self.unsplash_api_key))
            .finish()
    }
}

impl MontageConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/montage/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("montage").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("montage")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/montage-config/config.toml")
        }
    }

    /// Load from `path`, or from the default path if that file exists, or
    /// fall back to defaults. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Replace API keys with `PEXELS_API_KEY`, `PIXABAY_API_KEY` and
    /// `UNSPLASH_API_KEY` where those are set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with a
    /// custom variable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let credentials = &mut self.credentials;
        for (name, slot) in [
            (PEXELS_KEY_VAR, &mut credentials.pexels_api_key),
            (PIXABAY_KEY_VAR, &mut credentials.pixabay_api_key),
            (UNSPLASH_KEY_VAR, &mut credentials.unsplash_api_key),
        ] {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(variable = name, "API key taken from environment");
                *slot = value;
            }
        }
    }

    /// Build the search core's configuration from these settings.
    pub fn to_search_config(&self) -> SearchConfig {
        let search = &self.search;
        let defaults = SearchConfig::default();
        SearchConfig {
            per_source_limit: search.per_source_limit,
            timeout_seconds: search.timeout_seconds,
            request_deadline_seconds: search.request_deadline_seconds,
            user_agent: search.user_agent.clone().unwrap_or(defaults.user_agent),
            credentials: ProviderCredentials {
                pexels_api_key: self.credentials.pexels_api_key.clone(),
                pixabay_api_key: self.credentials.pixabay_api_key.clone(),
                unsplash_access_key: self.credentials.unsplash_api_key.clone(),
            },
            endpoints: ProviderEndpoints {
                pexels: search.endpoints.pexels.clone(),
                pixabay: search.endpoints.pixabay.clone(),
                unsplash: search.endpoints.unsplash.clone(),
                wikipedia: search.endpoints.wikipedia.clone(),
            },
        }
    }

    /// Validate the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] for an empty host, or
    /// [`ServiceError::Search`] if the search settings are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ServiceError::Config("server.host must not be empty".into()));
        }
        self.to_search_config().validate()?;
        Ok(())
    }
}
