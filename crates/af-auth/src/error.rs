//! Authentication error types.

use std::fmt;

/// Authenticator and registry errors.
///
/// A credential mismatch is not an error: `verify` reports it as `Ok(false)`.
#[derive(Debug)]
pub enum AuthError {
    /// An authenticator with the same id is already registered.
    DuplicateAuthenticator(String),
    /// A descriptor could not be built (e.g. malformed validation regex).
    InvalidDescriptor(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAuthenticator(id) => {
                write!(f, "authenticator already registered: {id}")
            }
            Self::InvalidDescriptor(msg) => write!(f, "invalid authenticator descriptor: {msg}"),
            Self::Internal(msg) => write!(f, "internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
