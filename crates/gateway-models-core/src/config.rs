use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::filter::ViewMode;

pub const DEFAULT_ENDPOINT: &str = "https://api.kilo.ai/api/gateway/models";

/// How long a successful initial load may be reused, in seconds.
pub const DEFAULT_REVALIDATE_SECS: u64 = 60;

/// Settings read from `config.toml`.
///
/// `revalidate_secs` only matters to a long-lived [`GatewayClient`] that calls
/// [`GatewayClient::initial_load`] more than once. The `gateway-models` binary
/// opens the catalog once per run and reloads through
/// [`GatewayClient::reload`], which ignores the window, so the key has no
/// effect there.
///
/// [`GatewayClient`]: crate::api::GatewayClient
/// [`GatewayClient::initial_load`]: crate::api::GatewayClient::initial_load
/// [`GatewayClient::reload`]: crate::api::GatewayClient::reload

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub revalidate_secs: u64,
    pub view: ViewMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            revalidate_secs: DEFAULT_REVALIDATE_SECS,
            view: ViewMode::Grid,
        }
    }
}

impl Config {
    /// Parse a config from a TOML string. Missing keys take defaults.
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Load a config file. Unlike [`Config::load_default`], a missing file is an error.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Load `<config_dir>/gateway-models/config.toml`, or defaults.
    #[cfg(feature = "network")]
    pub fn load_default() -> Self {
        let Some(path) = default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }
}

#[cfg(feature = "network")]
pub fn default_path() -> Option<std::path::PathBuf> {
    Some(dirs::config_dir()?.join("gateway-models").join("config.toml"))
}
