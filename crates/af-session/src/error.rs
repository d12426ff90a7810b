//! Flow error types.

use thiserror::Error;
use uuid::Uuid;

use crate::flow::FlowStatus;

/// Errors that can occur during flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Flow not found or expired.
    #[error("Flow not found: {0}")]
    NotFound(Uuid),

    /// A flow with this id already exists.
    #[error("Duplicate flow id: {0}")]
    Duplicate(Uuid),

    /// The status machine does not allow this transition.
    #[error("Invalid flow transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: FlowStatus,
        /// Requested status.
        to: FlowStatus,
    },

    /// The flow already completed.
    #[error("Flow already completed: {0}")]
    Completed(Uuid),

    /// The flow used up its failed attempts.
    #[error("Attempts exhausted for flow: {0}")]
    AttemptsExhausted(Uuid),

    /// Storage error.
    #[error("Flow storage error: {0}")]
    Storage(String),
}

impl FlowError {
    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;
