//! TOML file configuration structures.
//!
//! These structs directly map to the `aroi-config.toml` file format:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [handshake]
//! ttl_secs = 600
//!
//! [[delivery.tier]]
//! max_distance_km = 3.0
//! fee = 40
//!
//! [[delivery.tier]]
//! max_distance_km = 6.0
//! fee = 60
//!
//! [[delivery.tier]]
//! fee = 100
//! ```
//!
//! Omitting `[[delivery.tier]]` entirely selects the stock tier table.

use aroi_core::pricing::{DeliveryTier, default_tiers};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub handshake: HandshakeConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Handshake store configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// Configured token TTL in seconds. The effective TTL never drops
    /// below the store's 60-second floor.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    600
}

/// Delivery fee configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_tiers")]
    pub tier: Vec<DeliveryTier>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            tier: default_tiers(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.handshake.ttl_secs, 600);
        assert_eq!(config.delivery.tier, default_tiers());
    }

    #[test]
    fn explicit_tiers_override_the_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            listen = "127.0.0.1:3000"

            [handshake]
            ttl_secs = 120

            [[delivery.tier]]
            max_distance_km = 5.0
            fee = 50

            [[delivery.tier]]
            fee = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.handshake.ttl_secs, 120);
        assert_eq!(config.delivery.tier.len(), 2);
        assert_eq!(config.delivery.tier[0].fee, 50);
        assert_eq!(config.delivery.tier[1].max_distance_km, None);
    }
}
