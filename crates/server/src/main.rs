//! HTTP server for the course recommendation service.
//!
//! Reads its configuration from the environment (see `Config`), connects to
//! the Supabase project and serves until interrupted.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use server::{Config, init_tracing, serve, supabase_orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");

    info!("Starting course advisor server");

    let config = Config::load().context("Invalid configuration")?;
    let orchestrator = supabase_orchestrator(&config)?;

    let address = config.bind_addr().await?;
    info!("Binding to {address}");
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    serve(listener, orchestrator).await
}
