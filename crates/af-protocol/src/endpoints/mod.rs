//! Flow endpoint handlers for Axum.
//!
//! - Authorization (`GET`/`POST /authorize`) starts a flow
//! - Authentication (`POST /authn` by default) continues one
//!
//! ## Router Setup
//!
//! Use [`flow_router`] to create a router with both endpoints.
//!
//! ```rust,ignore
//! use af_protocol::endpoints::{flow_router, FlowState};
//!
//! let app = Router::new()
//!     .merge(flow_router("/authn"))
//!     .with_state(FlowState::new(engine));
//! ```

mod authn;
mod authorize;
mod router;
mod state;

pub use authn::authn;
pub use authorize::{authorize_get, authorize_post};
pub use router::{AUTHORIZE_PATH, flow_router};
pub use state::FlowState;
