//! # af-server
//!
//! Axum server for the authentication flow orchestrator.
//!
//! This crate wires the flow engine to HTTP:
//! - Flow endpoints (`/authorize` and the authentication endpoint)
//! - Health check endpoints
//! - A background task that evicts expired flows
//!
//! ## Usage
//!
//! ```ignore
//! use af_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config)?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod router;
pub mod state;
pub mod sweeper;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

/// The authentication flow server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// This validates the configuration and registers the authenticators.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Runs the server.
    ///
    /// This binds the configured address and blocks until it receives a shutdown signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper = sweeper::spawn_sweeper(
            Arc::clone(&self.state.engine),
            self.config.sweep_interval(),
        );

        let app = create_router(self.state);
        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        sweeper.abort();
        result?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates a test router without starting the server.
    ///
    /// The router shares this server's flow store.
    pub fn test_router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
