//! Error handling for authflow.
//!
//! Two things live here: [`ErrorKind`], the fixed catalog of protocol
//! errors a client can observe (each with a stable `ABA-` code), and
//! [`Error`], the internal error type for core operations.
//!
//! Catalog messages are fixed text. Request-specific detail is only ever
//! written to the log, next to the trace identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Catalog of protocol errors reported to clients.
///
/// Every variant maps to a stable `{code, message, description}` triple and
/// an HTTP status. Codes are part of the public contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Authorization request parameters are missing or invalid.
    InvalidRequest,
    /// Authentication request body lacks the flow or authenticator id.
    MissingAuthnParams,
    /// Flow id does not exist or has expired.
    UnknownFlow,
    /// Selected authenticator is not registered.
    UnsupportedAuthenticator,
    /// Flow already reached `SUCCESS_COMPLETED`.
    FlowCompleted,
    /// Flow has used up its failed-attempt allowance.
    AttemptsExhausted,
    /// Unexpected failure while handling the request.
    ServerError,
    /// Authenticator did not answer within the verification timeout.
    AuthenticatorUnavailable,
}

impl ErrorKind {
    /// All catalog entries, in code order.
    pub const ALL: [Self; 8] = [
        Self::InvalidRequest,
        Self::MissingAuthnParams,
        Self::UnknownFlow,
        Self::UnsupportedAuthenticator,
        Self::FlowCompleted,
        Self::AttemptsExhausted,
        Self::ServerError,
        Self::AuthenticatorUnavailable,
    ];

    /// Returns the stable error code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidRequest => "ABA-40000",
            Self::MissingAuthnParams => "ABA-40001",
            Self::UnknownFlow => "ABA-40002",
            Self::UnsupportedAuthenticator => "ABA-40003",
            Self::FlowCompleted => "ABA-40004",
            Self::AttemptsExhausted => "ABA-40005",
            Self::ServerError => "ABA-50000",
            Self::AuthenticatorUnavailable => "ABA-50300",
        }
    }

    /// Returns the short human-readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request parameters",
            Self::MissingAuthnParams => "Invalid authentication request",
            Self::UnknownFlow => "Invalid flow ID",
            Self::UnsupportedAuthenticator => "Unsupported authenticator",
            Self::FlowCompleted => "Flow already completed",
            Self::AttemptsExhausted => "Too many failed attempts",
            Self::ServerError => "Internal server error",
            Self::AuthenticatorUnavailable => "Authenticator unavailable",
        }
    }

    /// Returns the longer description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Missing or invalid required parameters",
            Self::MissingAuthnParams => "Missing required parameters in request body",
            Self::UnknownFlow => "The provided flow ID does not exist or has expired",
            Self::UnsupportedAuthenticator => "The provided authenticator is not supported",
            Self::FlowCompleted => "The authentication flow has already been completed",
            Self::AttemptsExhausted => {
                "The maximum number of authentication attempts for this flow has been reached"
            }
            Self::ServerError => "An unexpected error occurred while processing the request",
            Self::AuthenticatorUnavailable => "The authenticator did not respond in time",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidRequest
            | Self::MissingAuthnParams
            | Self::UnknownFlow
            | Self::UnsupportedAuthenticator
            | Self::FlowCompleted
            | Self::AttemptsExhausted => 400,
            Self::ServerError => 500,
            Self::AuthenticatorUnavailable => 503,
        }
    }

    /// Returns whether this error is caused by the server rather than the caller.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
