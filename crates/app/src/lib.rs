//! Command-line application for skillsrc.
//!
//! Parses the `skillsrc` command line, sets up logging and the async
//! runtime, and dispatches to the command handlers. The handlers print
//! human-facing output; library crates report progress through `tracing`.

#![deny(unsafe_code)]

pub mod cli;
mod commands;
pub mod feedback;
pub mod init;
pub mod upgrade;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use commands::{
    handle_feedback_command, handle_generate_index_command, handle_init_command,
    handle_list_skills_command, handle_sync_command, handle_upgrade_command,
    handle_validate_command,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// The main entry point for the `skillsrc` application.
pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command {
        Commands::Init {
            framework,
            agents,
            registry,
            yes,
        } => runtime.block_on(handle_init_command(&cwd, framework, agents, registry, yes)),
        Commands::Sync => runtime.block_on(handle_sync_command(&cwd)),
        Commands::ListSkills { framework } => {
            runtime.block_on(handle_list_skills_command(&cwd, framework))
        }
        Commands::Validate { all } => handle_validate_command(&cwd, all),
        Commands::GenerateIndex { skills_dir } => {
            handle_generate_index_command(&cwd.join(skills_dir))
        }
        Commands::Feedback(args) => runtime.block_on(handle_feedback_command(args)),
        Commands::Upgrade { dry_run } => runtime.block_on(handle_upgrade_command(dry_run)),
    }
}
