// ossflow - Object storage workflow check

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{execute_endpoint, execute_run};
use config::OssflowConfig;
use ossflow::cfg::create_trait_from_type_options;
use ossflow::{register_clients, AuthClient, StorageClient, Workflow};

/// Initialize tracing, RUST_LOG takes precedence over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the workflow from configuration
fn build_workflow(config: OssflowConfig) -> Result<Workflow> {
    register_clients();

    let auth: Box<dyn AuthClient> = create_trait_from_type_options(&config.auth_client)
        .context("Failed to create auth client")?;
    let storage: Box<dyn StorageClient> = create_trait_from_type_options(&config.storage_client)
        .context("Failed to create storage client")?;

    let workflow = Workflow::new(config.workflow, Arc::from(auth), Arc::from(storage))?;
    Ok(workflow)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = OssflowConfig::load(cli.config.as_deref())?;

    init_tracing(&config.log_level);
    tracing::debug!(
        auth_client = %config.auth_client.type_name,
        storage_client = %config.storage_client.type_name,
        "configuration loaded"
    );

    let workflow = build_workflow(config)?;

    // Execute command
    match &cli.command {
        Commands::Run(args) => execute_run(args, &workflow).await?,
        Commands::Endpoint => execute_endpoint(&workflow).await?,
    }

    Ok(())
}
