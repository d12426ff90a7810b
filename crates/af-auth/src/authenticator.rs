//! Authenticator trait.
//!
//! Authenticators are pluggable components that verify one kind of
//! credential (password, one-time code, federated assertion, ...).

use async_trait::async_trait;

use crate::descriptor::{AuthParams, AuthenticatorDescriptor};
use crate::error::AuthResult;

/// Message shown to the client when verification fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessage {
    /// Stable message identifier.
    pub message_id: String,
    /// Human-readable text.
    pub message: String,
    /// Localization key.
    pub i18n_key: String,
}

impl FailureMessage {
    /// Creates a message with i18n key `message.<message_id>`.
    #[must_use]
    pub fn new(message_id: impl Into<String>, message: impl Into<String>) -> Self {
        let message_id = message_id.into();
        Self {
            i18n_key: format!("message.{message_id}"),
            message_id,
            message: message.into(),
        }
    }
}

/// Authenticator trait.
///
/// Implementations must not hold locks across `verify`; the engine may call
/// it concurrently for different flows and bounds each call with a timeout.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the public descriptor.
    fn describe(&self) -> &AuthenticatorDescriptor;

    /// Returns the authenticator ID.
    fn id(&self) -> &str {
        &self.describe().authenticator_id
    }

    /// Returns the message rendered after a failed attempt.
    fn failure_message(&self) -> FailureMessage {
        FailureMessage::new("msg_authentication_failed", "Authentication failed.")
    }

    /// Verifies submitted parameters.
    ///
    /// Returns `Ok(false)` for rejected credentials; `Err` is reserved for
    /// failures to reach a verdict.
    async fn verify(&self, params: &AuthParams) -> AuthResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ParamDescriptor, ParamType};

    struct PinAuthenticator {
        descriptor: AuthenticatorDescriptor,
    }

    #[async_trait]
    impl Authenticator for PinAuthenticator {
        fn describe(&self) -> &AuthenticatorDescriptor {
            &self.descriptor
        }

        async fn verify(&self, params: &AuthParams) -> AuthResult<bool> {
            Ok(params.get("pin").is_some_and(|pin| pin == "1234"))
        }
    }

    fn pin() -> PinAuthenticator {
        PinAuthenticator {
            descriptor: AuthenticatorDescriptor::new("PinAuthenticator", "LOCAL", "PIN")
                .required_param(ParamDescriptor::new("pin", ParamType::Integer, 1).confidential()),
        }
    }

    #[test]
    fn failure_message_key() {
        let msg = FailureMessage::new("msg_invalid_un_pw", "Invalid username or password.");
        assert_eq!(msg.i18n_key, "message.msg_invalid_un_pw");
    }

    #[test]
    fn default_id_and_message() {
        let auth = pin();
        assert_eq!(auth.id(), AuthenticatorDescriptor::derive_id("PinAuthenticator", "LOCAL"));
        assert_eq!(auth.failure_message().message_id, "msg_authentication_failed");
    }

    #[tokio::test]
    async fn verify_through_trait_object() {
        let auth: Box<dyn Authenticator> = Box::new(pin());
        let mut params = AuthParams::new();
        params.insert("pin".to_string(), "1234".to_string());
        assert!(auth.verify(&params).await.unwrap());

        params.insert("pin".to_string(), "0000".to_string());
        assert!(!auth.verify(&params).await.unwrap());
    }
}
