//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use std::sync::Arc;

use af_auth::{AuthenticatorRegistry, BasicAuthenticator};
use af_protocol::{FlowEngine, FlowState};
use af_session::InMemoryFlowStore;

use crate::config::ServerConfig;

/// Engine type served by this binary.
pub type Engine = FlowEngine<InMemoryFlowStore>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// Flow engine.
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Creates the application state, registering the built-in authenticators.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let mut registry = AuthenticatorRegistry::new();
        registry.register(BasicAuthenticator::with_policy(
            config.basic_username.as_str(),
            &config.basic_password,
            config.password_policy(),
        )?)?;
        tracing::info!(authenticators = registry.len(), "authenticator registry ready");

        let engine = FlowEngine::new(
            Arc::new(InMemoryFlowStore::new()),
            Arc::new(registry),
            config.flow_config(),
        );

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }

    /// Gets the state for the flow endpoints.
    pub fn flow_state(&self) -> FlowState<InMemoryFlowStore> {
        FlowState::from_arc(Arc::clone(&self.engine))
    }

    /// Returns the server configuration.
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }
}
