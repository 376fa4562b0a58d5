//! Check-policy command - validates and prints the active rule set.

use std::path::Path;

use anyhow::Result;
use docgate_server::bootstrap::build_engine;

pub fn run(project_dir: Option<&Path>) -> Result<()> {
    let config = super::load_config(project_dir)?;
    let engine = build_engine(&config.policy)?;
    let policy = engine.policy();

    println!("Policy {} is valid", policy.version);
    println!("  Default effect: {:?}", policy.default_effect);
    println!();
    println!("{:<4} {:<28} {:<8} {:>8}  CONDITIONS", "#", "RULE", "EFFECT", "PRIORITY");
    for (i, rule) in engine.rules_in_order().enumerate() {
        println!(
            "{:<4} {:<28} {:<8} {:>8}  {:?}",
            i + 1,
            rule.name,
            format!("{:?}", rule.effect),
            rule.priority,
            rule.conditions
        );
    }
    Ok(())
}
