// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use photo_studio::{api::start_server, config::ServerConfig, version};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));
    info!(
        "AI effects: {}",
        if config.api_token().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    if let Some(ref dir) = config.static_dir {
        info!("Static UI directory: {}", dir.display());
    }

    start_server(config).await
}
