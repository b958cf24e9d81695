// ABOUTME: Server binary for the food tracking REST API
// ABOUTME: Loads configuration, runs migrations, and serves the HTTP router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! # Food Tracking API Server Binary
//!
//! Starts the REST API with its SQLite database, applying schema
//! migrations on boot.

use anyhow::Result;
use clap::Parser;
use remy_food_server::{
    config::environment::ServerConfig, database::Database, logging, resources::ServerResources,
    routes,
};
use std::sync::Arc;
use tracing::info;

/// Command line arguments
#[derive(Parser)]
#[command(name = "remy-food-server")]
#[command(about = "Food tracking REST API with recursive recipe nutrient aggregation")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting food tracking API server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database ready: {}", config.database.url);

    let bind_address = format!("0.0.0.0:{}", config.http_port);
    let resources = Arc::new(ServerResources::new(database, config));
    let router = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("HTTP server listening on {bind_address}");
    axum::serve(listener, router).await?;

    Ok(())
}
