//! Basic username/password authenticator.
//!
//! Compares submitted credentials against a single configured pair. The
//! password is kept only as an Argon2id hash.

use std::sync::Arc;

use async_trait::async_trait;

use crate::authenticator::{Authenticator, FailureMessage};
use crate::descriptor::{AuthParams, AuthenticatorDescriptor, ParamDescriptor, ParamType};
use crate::error::{AuthError, AuthResult};
use crate::password::{PasswordHasherService, PasswordPolicy};

/// Authenticator name used to derive the id.
pub const BASIC_AUTHENTICATOR_NAME: &str = "BasicAuthenticator";

/// Identity provider tag for locally verified credentials.
pub const LOCAL_IDP: &str = "LOCAL";

/// Id of the basic authenticator (`base64("BasicAuthenticator:LOCAL")`).
pub const BASIC_AUTHENTICATOR_ID: &str = "QmFzaWNBdXRoZW50aWNhdG9yOkxPQ0FM";

/// Username parameter name.
pub const USERNAME_PARAM: &str = "username";

/// Password parameter name.
pub const PASSWORD_PARAM: &str = "password";

const USERNAME_PATTERN: &str = r"^[\S]{3,50}$";

/// Username & password authenticator.
pub struct BasicAuthenticator {
    descriptor: AuthenticatorDescriptor,
    username: String,
    password_hash: Arc<str>,
    hasher: Arc<PasswordHasherService>,
}

impl BasicAuthenticator {
    /// Creates an authenticator for one username/password pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be hashed.
    pub fn new(username: impl Into<String>, password: &str) -> AuthResult<Self> {
        Self::with_policy(username, password, PasswordPolicy::default())
    }

    /// Creates an authenticator with a custom hashing policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be hashed.
    pub fn with_policy(
        username: impl Into<String>,
        password: &str,
        policy: PasswordPolicy,
    ) -> AuthResult<Self> {
        let hasher = PasswordHasherService::new(policy);
        let password_hash = hasher.hash(password)?;

        Ok(Self {
            descriptor: Self::descriptor()?,
            username: username.into(),
            password_hash: password_hash.into(),
            hasher: Arc::new(hasher),
        })
    }

    fn descriptor() -> AuthResult<AuthenticatorDescriptor> {
        Ok(
            AuthenticatorDescriptor::new(BASIC_AUTHENTICATOR_NAME, LOCAL_IDP, "Username & Password")
                .i18n_key("authenticator.basic")
                .required_param(
                    ParamDescriptor::new(USERNAME_PARAM, ParamType::String, 1)
                        .with_validation(USERNAME_PATTERN)?,
                )
                .required_param(
                    ParamDescriptor::new(PASSWORD_PARAM, ParamType::String, 2).confidential(),
                ),
        )
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn describe(&self) -> &AuthenticatorDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> FailureMessage {
        FailureMessage::new("msg_invalid_un_pw", "Invalid username or password.")
    }

    async fn verify(&self, params: &AuthParams) -> AuthResult<bool> {
        let (Some(username), Some(password)) =
            (params.get(USERNAME_PARAM), params.get(PASSWORD_PARAM))
        else {
            return Ok(false);
        };

        let username_ok =
            af_crypto::constant_time_eq(username.as_bytes(), self.username.as_bytes());

        // Hash even on a username mismatch so both outcomes cost the same.
        let hasher = Arc::clone(&self.hasher);
        let hash = Arc::clone(&self.password_hash);
        let password = password.clone();
        let password_ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))??;

        Ok(username_ok && password_ok)
    }
}
