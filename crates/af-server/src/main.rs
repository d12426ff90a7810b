//! # authflow
//!
//! Main entry point for the authentication flow server.

#![forbid(unsafe_code)]
#![deny(warnings)]

use af_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "authflow starting");

    Server::new(config)?.run().await
}
