//! Classify command - shows how an address is classified.

use std::path::Path;

use anyhow::Result;
use docgate_server::bootstrap::build_classifier;

pub fn run(addr: &str, project_dir: Option<&Path>) -> Result<()> {
    let config = super::load_config(project_dir)?;
    let classifier = build_classifier(&config.network)?;
    let context = classifier.classify(addr);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
