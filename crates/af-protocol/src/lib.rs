//! # af-protocol
//!
//! Authentication flow protocol for authflow.
//!
//! ## Modules
//!
//! - [`engine`] - the flow orchestrator
//! - [`endpoints`] - Axum HTTP handlers for `/authorize` and `/authn`
//! - [`error`] - protocol errors rendered as `{code, message, description, traceId}`
//! - [`request`] - request envelopes
//! - [`response`] - response envelopes

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod endpoints;
pub mod engine;
pub mod error;
pub mod request;
pub mod response;

pub use endpoints::{FlowState, flow_router};
pub use engine::FlowEngine;
pub use error::{ErrorResponse, ProtocolError, ProtocolResult};
pub use request::{AuthnRequest, InitiateRequest, SelectedAuthenticator};
pub use response::{
    AuthData, AuthnResponse, CompletedResponse, FlowResponse, Link, Message, MessageContext,
    MessageType, NextStep, StepType,
};
