// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use docqa_server::{config::ServiceConfig, start_server, version};
use std::env;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));

    let config = ServiceConfig::parse();
    info!("Configuration: {:?}", config);
    if config.llm_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; the QA engine may reject queries");
    }

    start_server(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
