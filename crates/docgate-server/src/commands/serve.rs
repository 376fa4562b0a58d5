//! Serve command - runs the gateway until SIGINT or SIGTERM.

use std::path::Path;

use anyhow::{Context, Result};
use docgate::Readiness;
use docgate_server::bootstrap::build_gateway;
use docgate_server::{AppState, Server, shutdown_signal};
use tracing::info;

pub fn run(project_dir: Option<&Path>, bind: Option<&str>) -> Result<()> {
    let mut config = super::load_config(project_dir)?;
    if let Some(bind) = bind {
        config.server.bind_address = bind.to_string();
    }

    let gateway = build_gateway(&config)?;
    let state = AppState::new(gateway, Readiness::new());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let server = Server::bind(&config.server, state)
            .await
            .context("Failed to start server")?;

        println!();
        println!("docgate - document access gateway");
        println!();
        println!("  Listening on:    {}", server.local_addr()?);
        println!(
            "  Geo restriction: {}",
            if config.policy.geo_restriction { "on" } else { "off" }
        );
        println!();
        println!("Press Ctrl+C to stop");

        server.run_until(shutdown_signal()).await?;
        info!("docgate stopped");
        Ok(())
    })
}
