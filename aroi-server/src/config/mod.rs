//! Configuration module for aroi-server.
//!
//! Handles loading configuration from TOML files and CLI overrides, and
//! validates the delivery tier table before it reaches the fee
//! calculator.

pub mod file;

use crate::config::file::FileConfig;
use aroi_core::pricing::{self, DeliveryTier, TierConfigError};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid delivery tiers: {0}")]
    Tiers(#[from] TierConfigError),
}

/// Loaded, validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub handshake_ttl: time::Duration,
    pub tiers: Vec<DeliveryTier>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and validate the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file selects all defaults)
    /// 2. Apply CLI overrides
    /// 3. Validate the delivery tier invariants
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = ?self.config_path, "no config file, using defaults");
                FileConfig {
                    server: Default::default(),
                    handshake: Default::default(),
                    delivery: Default::default(),
                }
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        pricing::validate_tiers(&file_config.delivery.tier)?;

        let ttl_secs = i64::try_from(file_config.handshake.ttl_secs).unwrap_or(i64::MAX);

        Ok(LoadedConfig {
            listen: file_config.server.listen,
            handshake_ttl: time::Duration::seconds(ttl_secs),
            tiers: file_config.delivery.tier,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let loader = ConfigLoader::new("/definitely/not/here.toml", None);
        let config = loader.load().unwrap();
        assert_eq!(config.tiers, aroi_core::pricing::default_tiers());
        assert_eq!(config.handshake_ttl, time::Duration::seconds(600));
    }

    #[test]
    fn listen_override_wins() {
        let listen: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loader = ConfigLoader::new("/definitely/not/here.toml", Some(listen));
        assert_eq!(loader.load().unwrap().listen, listen);
    }
}
