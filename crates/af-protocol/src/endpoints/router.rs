//! Flow router configuration.

use af_session::FlowStore;
use axum::{
    Router,
    routing::{get, post},
};

use super::authn::authn;
use super::authorize::{authorize_get, authorize_post};
use super::state::FlowState;

/// Path of the authorization endpoint.
pub const AUTHORIZE_PATH: &str = "/authorize";

/// Creates the flow router.
///
/// # Endpoints
///
/// | Method | Path           | Handler          | Description          |
/// |--------|----------------|------------------|----------------------|
/// | GET    | `/authorize`   | `authorize_get`  | Start a flow (query) |
/// | POST   | `/authorize`   | `authorize_post` | Start a flow (form)  |
/// | POST   | `authn_path`   | `authn`          | Continue a flow      |
///
/// `authn_path` should match the href the engine advertises in `links`.
pub fn flow_router<S: FlowStore + 'static>(authn_path: &str) -> Router<FlowState<S>> {
    Router::new()
        .route(AUTHORIZE_PATH, get(authorize_get::<S>).post(authorize_post::<S>))
        .route(authn_path, post(authn::<S>))
}
