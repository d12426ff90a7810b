//! # af-auth
//!
//! Authenticators for authflow.
//!
//! An authenticator is a pluggable credential check with a declared
//! parameter contract (its [`AuthenticatorDescriptor`]). The
//! [`AuthenticatorRegistry`] holds every authenticator a flow may offer,
//! keyed by authenticator id, so new variants are added by registration
//! alone.
//!
//! ## Features
//!
//! - Descriptor model rendered verbatim into authenticator prompts
//! - Basic username/password authenticator
//! - Argon2id password hashing (NIST SP 800-63B compliant)
//!
//! ## Example
//!
//! ```ignore
//! use af_auth::{AuthenticatorRegistry, BasicAuthenticator};
//!
//! let mut registry = AuthenticatorRegistry::new();
//! registry.register(BasicAuthenticator::new("admin", "admin")?)?;
//!
//! let basic = registry.resolve(af_auth::basic::BASIC_AUTHENTICATOR_ID).unwrap();
//! let ok = basic.verify(&params).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod basic;
pub mod descriptor;
pub mod error;
pub mod password;
pub mod registry;

pub use authenticator::{Authenticator, FailureMessage};
pub use basic::BasicAuthenticator;
pub use descriptor::{
    AuthParams, AuthenticatorDescriptor, ParamDescriptor, ParamType, ParamViolation, PromptType,
};
pub use error::{AuthError, AuthResult};
pub use password::{PasswordHasherService, PasswordPolicy};
pub use registry::AuthenticatorRegistry;
