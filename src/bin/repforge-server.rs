// ABOUTME: Server binary wiring configuration, logging, storage, and the HTTP router
// ABOUTME: Runs the Repforge workout tracking backend until interrupted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! # Repforge Server Binary
//!
//! Starts the workout-tracking backend: exercise and routine queries plus
//! the bulk JSON import endpoints.

use anyhow::Result;
use clap::Parser;
use repforge::config::environment::ServerConfig;
use repforge::database::Database;
use repforge::logging;
use repforge::resources::ServerResources;
use repforge::routes::build_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "repforge-server")]
#[command(about = "Repforge - workout tracking backend with bulk import")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database connection string
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Repforge server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(database, config.clone()));
    let router = build_router(resources);

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("HTTP server listening on http://0.0.0.0:{}", config.http_port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}
