//! Protocol error types.
//!
//! Every rejected request is rendered as
//! `{code, message, description, traceId}` with the HTTP status of its
//! [`ErrorKind`]. The trace id is fresh per response and is written to the
//! log line describing the failure, so a client report can be matched to the
//! server-side detail that never leaves the process.

use af_auth::AuthError;
use af_core::ErrorKind;
use af_session::FlowError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A rejected protocol request.
#[derive(Debug, Error)]
#[error("{kind}: {detail}")]
pub struct ProtocolError {
    /// Catalog entry rendered on the wire.
    pub kind: ErrorKind,
    /// Server-side detail, logged and never sent.
    pub detail: String,
}

impl ProtocolError {
    /// Creates a protocol error.
    #[must_use]
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Creates an `ABA-40000` error.
    #[must_use]
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, detail)
    }

    /// Creates an `ABA-40001` error.
    #[must_use]
    pub fn missing_authn_params(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingAuthnParams, detail)
    }

    /// Creates an `ABA-40002` error.
    #[must_use]
    pub fn unknown_flow(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownFlow, detail)
    }

    /// Creates an `ABA-40003` error.
    #[must_use]
    pub fn unsupported_authenticator(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedAuthenticator, detail)
    }

    /// Creates an `ABA-50000` error.
    #[must_use]
    pub fn server_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError, detail)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Builds the wire body for this error.
    #[must_use]
    pub fn to_error_response(&self, trace_id: Uuid) -> ErrorResponse {
        ErrorResponse {
            code: self.kind.code().to_string(),
            message: self.kind.message().to_string(),
            description: self.kind.description().to_string(),
            trace_id: trace_id.to_string(),
        }
    }
}

impl From<FlowError> for ProtocolError {
    fn from(err: FlowError) -> Self {
        let kind = match err {
            FlowError::NotFound(_) => ErrorKind::UnknownFlow,
            FlowError::Completed(_) => ErrorKind::FlowCompleted,
            FlowError::AttemptsExhausted(_) => ErrorKind::AttemptsExhausted,
            FlowError::Duplicate(_) | FlowError::InvalidTransition { .. } | FlowError::Storage(_) => {
                ErrorKind::ServerError
            }
        };
        Self::new(kind, err.to_string())
    }
}

impl From<AuthError> for ProtocolError {
    fn from(err: AuthError) -> Self {
        Self::server_error(err.to_string())
    }
}

impl IntoResponse for ProtocolError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        if self.kind.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                code = self.kind.code(),
                detail = %self.detail,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                code = self.kind.code(),
                detail = %self.detail,
                "request rejected"
            );
        }

        (self.status_code(), Json(self.to_error_response(trace_id))).into_response()
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Stable error code, e.g. `ABA-40002`.
    pub code: String,
    /// Short message.
    pub message: String,
    /// Longer description.
    pub description: String,
    /// Correlation id for this response.
    pub trace_id: String,
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
