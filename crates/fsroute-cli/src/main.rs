mod commands;
mod config;
mod project;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fsroute::{ExecutionMode, Platform};
use tracing::Level;

use project::Project;

#[derive(Parser)]
#[command(name = "fsroute")]
#[command(version, about = "fsroute CLI - inspect file-system route trees and server manifests", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, default_value = "fsroute.toml")]
    config: PathBuf,

    /// Target platform for platform-specific files
    #[arg(short, long, global = true)]
    platform: Option<Platform>,

    /// Resolve conflicts the way a production build does
    #[arg(long, global = true)]
    production: bool,

    /// Log routing decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled route tree
    Tree {
        /// Print JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },

    /// Print the server manifest as JSON
    Manifest {
        /// Expand dynamic routes with their configured static params
        #[arg(long)]
        static_params: bool,
    },

    /// Show which route a request path dispatches to
    Match {
        /// Request path, e.g. /users/42
        path: String,

        /// Expand dynamic routes with their configured static params
        #[arg(long)]
        static_params: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let project = Project::load(&cli.config, |options| {
        if let Some(platform) = cli.platform {
            options.platform = Some(platform);
        }
        if cli.production {
            options.mode = ExecutionMode::Production;
        }
    })?;

    // Execute command
    match cli.command {
        Commands::Tree { json } => {
            commands::tree::execute(&project, json)?;
        }
        Commands::Manifest { static_params } => {
            commands::manifest::execute(&project, static_params).await?;
        }
        Commands::Match { path, static_params } => {
            commands::matcher::execute(&project, &path, static_params).await?;
        }
    }

    Ok(())
}
