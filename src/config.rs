//! Configuration types.

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Environment variable for the REST server port.
pub const ENV_PORT: &str = "ONBOARD_FLOW_PORT";
/// Environment variable for the variant storage directory.
pub const ENV_STORAGE_DIR: &str = "ONBOARD_FLOW_STORAGE_DIR";
/// Environment variable toggling the REST server (`0`/`false` disables it).
pub const ENV_HTTP: &str = "ONBOARD_FLOW_HTTP";

/// Engine host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Port the REST server binds on `0.0.0.0`.
    pub port: u16,
    /// Directory holding the persisted variant record.
    pub storage_dir: PathBuf,
    /// Whether to start the REST server next to the REPL.
    pub serve_http: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            storage_dir: PathBuf::from("./data"),
            serve_http: true,
        }
    }
}

impl EngineConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PORT) {
            config.port = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: ENV_PORT.to_string(),
                message: format!("{raw:?} is not a valid port: {e}"),
            })?;
        }

        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            if !dir.trim().is_empty() {
                config.storage_dir = PathBuf::from(dir);
            }
        }

        if let Some(flag) = lookup(ENV_HTTP) {
            config.serve_http = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }

        Ok(config)
    }
}
