//! docgate command-line interface.
//!
//! ```bash
//! # Serve with docgate.toml from the current directory
//! docgate serve
//!
//! # Show the active rule set
//! docgate check-policy --project-dir ./deploy
//!
//! # See how an address would be classified
//! docgate classify 203.0.113.7
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// docgate - attribute-based access control in front of a document store.
#[derive(Parser)]
#[command(name = "docgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Directory containing docgate.toml.
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Override server.bind_address.
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Validate the active policy and print its rules in evaluation order.
    CheckPolicy {
        /// Directory containing docgate.toml.
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },

    /// Classify a client address as the gateway would.
    Classify {
        /// Address to classify, e.g. 203.0.113.7 or ::1.
        addr: String,

        /// Directory containing docgate.toml.
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { project_dir, bind } => {
            commands::serve::run(project_dir.as_deref(), bind.as_deref())
        }
        Commands::CheckPolicy { project_dir } => commands::check_policy::run(project_dir.as_deref()),
        Commands::Classify { addr, project_dir } => {
            commands::classify::run(&addr, project_dir.as_deref())
        }
    }
}
