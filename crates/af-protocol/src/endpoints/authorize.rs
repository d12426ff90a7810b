//! Authorization endpoint handler.
//!
//! Implements GET/POST `/authorize`, which validates an authorization
//! request and starts a flow.

use af_session::FlowStore;
use axum::{
    Form, Json,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ProtocolError;
use crate::request::InitiateRequest;

use super::state::FlowState;

/// GET `/authorize`
///
/// # Parameters
///
/// Required:
/// - `response_type`: must be `code`
/// - `client_id`: the client identifier
/// - `response_mode`: must be `direct`
/// - `redirect_uri`: echoed into the flow
///
/// Optional:
/// - `scope`: defaults to `openid`
/// - `state`: echoed back on completion
///
/// # Responses
///
/// - 200 OK: flow created, authenticator prompt
/// - 400 Bad Request: `ABA-40000`
pub async fn authorize_get<S: FlowStore + 'static>(
    State(state): State<FlowState<S>>,
    request: Result<Query<InitiateRequest>, QueryRejection>,
) -> Response {
    match request {
        Ok(Query(request)) => handle_authorize(&state, &request).await,
        Err(rejection) => ProtocolError::invalid_request(rejection.body_text()).into_response(),
    }
}

/// POST `/authorize`
///
/// Same as GET but accepts form-encoded parameters.
pub async fn authorize_post<S: FlowStore + 'static>(
    State(state): State<FlowState<S>>,
    request: Result<Form<InitiateRequest>, FormRejection>,
) -> Response {
    match request {
        Ok(Form(request)) => handle_authorize(&state, &request).await,
        Err(rejection) => ProtocolError::invalid_request(rejection.body_text()).into_response(),
    }
}

async fn handle_authorize<S: FlowStore>(state: &FlowState<S>, request: &InitiateRequest) -> Response {
    match state.engine.initiate(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}
