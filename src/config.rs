//! Console configuration
//!
//! Loaded from an optional `linkdeck.toml` next to the binary plus
//! `LINKDECK_`-prefixed environment variables (`LINKDECK_API__BASE_URL`,
//! `LINKDECK_API__KEY`, ...). Env wins over file; everything has a
//! default so a bare invocation still starts (in offline demo mode).

use serde::{Deserialize, Serialize};

use crate::errors::{ConsoleError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Full API base, e.g. `http://127.0.0.1:8080/api/v1`.
    /// Empty → offline demo gateway.
    #[serde(default)]
    pub base_url: String,
    /// Value of the `X-API-Key` header
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_page_size() -> u64 {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load file + environment, falling back to defaults field by field
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("linkdeck").required(false))
            .add_source(
                config::Environment::with_prefix("LINKDECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConsoleError::config(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| ConsoleError::config(e.to_string()))
    }

    pub fn offline(&self) -> bool {
        self.api.base_url.trim().is_empty()
    }
}
