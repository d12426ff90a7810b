//! Authentication endpoint handler.

use af_session::FlowStore;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ProtocolError;
use crate::request::AuthnRequest;

use super::state::FlowState;

/// POST `/authn`
///
/// Body: `{flowId, selectedAuthenticator: {authenticatorId, params}}`.
///
/// # Responses
///
/// - 200 OK: `SUCCESS_COMPLETED` with an authorization code, or
///   `FAIL_INCOMPLETE` with the prompt and a failure message
/// - 400 Bad Request: `ABA-40001` to `ABA-40005`
/// - 500 Internal Server Error: `ABA-50000`
/// - 503 Service Unavailable: `ABA-50300`
pub async fn authn<S: FlowStore + 'static>(
    State(state): State<FlowState<S>>,
    request: Result<Json<AuthnRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return ProtocolError::missing_authn_params(rejection.body_text()).into_response();
        }
    };

    match state.engine.authenticate(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}
