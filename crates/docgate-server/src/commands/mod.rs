//! CLI command implementations.

pub mod check_policy;
pub mod classify;
pub mod serve;

use std::path::Path;

use anyhow::Result;
use docgate_config::{ConfigLoader, GatewayConfig};

/// Loads configuration from `project_dir`, or the current directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<GatewayConfig> {
    let loader = match project_dir {
        Some(dir) => ConfigLoader::new().with_project_dir(dir),
        None => ConfigLoader::new(),
    };
    loader.load()
}
