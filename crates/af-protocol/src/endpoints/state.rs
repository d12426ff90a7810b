//! Shared state for flow endpoints.

use std::sync::Arc;

use af_session::FlowStore;

use crate::engine::FlowEngine;

/// Shared state for flow endpoints.
pub struct FlowState<S: FlowStore> {
    /// Engine driving every flow.
    pub engine: Arc<FlowEngine<S>>,
}

impl<S: FlowStore> FlowState<S> {
    /// Creates a new flow state.
    pub fn new(engine: FlowEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Creates a new flow state from an Arc.
    pub const fn from_arc(engine: Arc<FlowEngine<S>>) -> Self {
        Self { engine }
    }
}

impl<S: FlowStore> Clone for FlowState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}
