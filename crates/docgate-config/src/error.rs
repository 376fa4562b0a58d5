//! Configuration error types

use docgate_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {address:?}: {source}")]
    InvalidBindAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid domestic range table: {0}")]
    InvalidRange(#[from] NetworkError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}
