// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Oncora clinic back end server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use oncora_api::{ApiServer, AppState, TokenService};
use oncora_core::MemoryStore;

mod cli;
mod config;
mod logging;
mod seed;

use cli::{Cli, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&cli.config).await,
        Commands::Validate => validate(&cli.config),
        Commands::Version => {
            println!("oncora v{}", oncora_core::VERSION);
            Ok(())
        }
    }
}

/// Starts the server.
async fn run(config_path: &std::path::Path) -> Result<()> {
    let app_config = AppConfig::load_or_default(config_path)?;

    // A bad signing key must stop the process before it binds.
    let state = AppState::builder()
        .config(app_config.api.clone())
        .memory_store(Arc::new(MemoryStore::new()))
        .build()
        .context("invalid configuration")?;

    seed::apply_seed(&state, &app_config.seed).await?;

    let server = ApiServer::new(state);
    tracing::info!(addr = %server.addr(), "oncora starting");

    server
        .run_with_shutdown(shutdown_signal())
        .await
        .context("server failed")?;
    Ok(())
}

/// Validates the configuration file and exits.
fn validate(config_path: &std::path::Path) -> Result<()> {
    let app_config = AppConfig::load(config_path)?;
    TokenService::new(app_config.api.token.clone()).context("token configuration is invalid")?;

    println!("configuration ok: {}", config_path.display());
    Ok(())
}

/// Resolves when the process receives a termination signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
