//! Application configuration.
//!
//! Resolution order, later layers winning field by field:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. The TOML file: `--config <path>`, or `parcel.toml` in the working
//!    directory when it exists
//! 3. Environment variables (`PARCEL_API_URL`, `PARCEL_API_TOKEN`,
//!    `PARCEL_FORM_ENDPOINT`)
//! 4. Command line flags, applied by the binary
//!
//! Every section may be omitted; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use parcel_core::ApiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "parcel.toml";

pub const ENV_API_URL: &str = "PARCEL_API_URL";
pub const ENV_API_TOKEN: &str = "PARCEL_API_TOKEN";
pub const ENV_FORM_ENDPOINT: &str = "PARCEL_FORM_ENDPOINT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("invalid config file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub form: FormSection,
    pub catalog: CatalogSection,
    pub logging: LoggingSection,
}

/// `[api]`: where the analysis API lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub login_route: String,
    pub request_timeout_secs: Option<u64>,
    pub token: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        let client = ApiConfig::default();
        Self {
            base_url: client.base_url,
            login_route: client.login_route,
            request_timeout_secs: client.request_timeout_secs,
            token: None,
        }
    }
}

impl ApiSection {
    pub fn client_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            login_route: self.login_route.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

/// `[form]`: lead form endpoint. There is no default endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSection {
    pub endpoint: Option<String>,
}

/// `[catalog]`: optional CSV replacements for the built-in catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub ports_csv: Option<PathBuf>,
    pub vessels_csv: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// A bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(
        content: &str,
        origin: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads the config file.
    ///
    /// An explicit `path` must exist. Without one, `parcel.toml` is read if
    /// present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let origin = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %origin, "loaded config file");
        Self::from_toml_str(&content, &origin)
    }

    /// Applies environment overrides read through `lookup`. Empty values are
    /// ignored.
    pub fn apply_env_overrides<F>(
        &mut self,
        lookup: F,
    ) where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty(ENV_API_TOKEN) {
            self.api.token = Some(token);
        }
        if let Some(endpoint) = non_empty(ENV_FORM_ENDPOINT) {
            self.form.endpoint = Some(endpoint);
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(|key| std::env::var(key).ok());
    }
}
