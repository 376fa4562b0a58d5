//! Configuration management for docgate
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the binary)
//! 2. Environment variables (`DOCGATE_` prefix, `__` between section and key)
//! 3. docgate.local.toml (gitignored, local overrides)
//! 4. docgate.toml (git-tracked, project config)
//! 5. ~/.config/docgate/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use docgate_network::{DEFAULT_DOMESTIC_RANGES, RangeTable};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main docgate configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    pub policy: PolicyConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Seconds to keep serving after a shutdown signal while health reports 503.
    pub drain_grace_secs: u64,
    /// Upper bound on waiting for in-flight requests once accepting stops.
    pub shutdown_timeout_secs: u64,
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            drain_grace_secs: 5,
            shutdown_timeout_secs: 30,
            max_request_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn drain_grace(&self) -> Duration {
        Duration::from_secs(self.drain_grace_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddress {
                address: self.bind_address.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Honour `X-Forwarded-For` / `X-Real-IP`. Disable without a trusted proxy.
    pub trust_forwarded_headers: bool,
    /// CIDR blocks classified as domestic.
    pub domestic_ranges: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            trust_forwarded_headers: true,
            domestic_ranges: DEFAULT_DOMESTIC_RANGES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl NetworkConfig {
    /// Parses the configured domestic ranges.
    pub fn domestic_table(&self) -> Result<RangeTable, ConfigError> {
        Ok(RangeTable::parse(&self.domestic_ranges)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Deny requests from public addresses outside the domestic table.
    pub geo_restriction: bool,
    /// JSON policy replacing the built-in document policy.
    pub policy_file: Option<PathBuf>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            geo_restriction: true,
            policy_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON documents and associations loaded into the in-memory store.
    pub seed_file: Option<PathBuf>,
}

impl GatewayConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if let Some(file) = self.policy.policy_file.as_mut() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }

        if let Some(file) = self.store.seed_file.as_mut() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }

    /// Checks values that cannot be expressed in the types.
    ///
    /// Invalid ranges are rejected here so classification never meets them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        self.network.domestic_table()?;

        if self.server.max_request_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_request_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
