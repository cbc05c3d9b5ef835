//! Page configuration

use serde::{Deserialize, Serialize};

/// Page loading configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document URL
    pub url: String,
    /// Create dropdowns for `[data-dropdown]` markup on `DOMContentLoaded`
    pub auto_init_dropdowns: bool,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            auto_init_dropdowns: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a (partial) JSON config; missing fields take the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_auto_init(mut self, enabled: bool) -> Self {
        self.auto_init_dropdowns = enabled;
        self
    }
}
