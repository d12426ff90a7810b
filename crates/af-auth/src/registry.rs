//! Registry of available authenticators.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::authenticator::Authenticator;
use crate::descriptor::AuthenticatorDescriptor;
use crate::error::{AuthError, AuthResult};

/// Catalog of authenticators keyed by authenticator id.
///
/// The registry is built once at startup and shared read-only; iteration
/// follows registration order, which is also the order authenticators are
/// offered in a prompt.
#[derive(Default)]
pub struct AuthenticatorRegistry {
    entries: Vec<Arc<dyn Authenticator>>,
    index: HashMap<String, usize>,
}

impl AuthenticatorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an authenticator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateAuthenticator` if the id is taken.
    pub fn register<A>(&mut self, authenticator: A) -> AuthResult<()>
    where
        A: Authenticator + 'static,
    {
        self.register_arc(Arc::new(authenticator))
    }

    /// Registers a shared authenticator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateAuthenticator` if the id is taken.
    pub fn register_arc(&mut self, authenticator: Arc<dyn Authenticator>) -> AuthResult<()> {
        let id = authenticator.id().to_string();
        if self.index.contains_key(&id) {
            return Err(AuthError::DuplicateAuthenticator(id));
        }

        tracing::debug!(authenticator_id = %id, "registered authenticator");
        self.index.insert(id, self.entries.len());
        self.entries.push(authenticator);
        Ok(())
    }

    /// Looks up an authenticator by id.
    #[must_use]
    pub fn resolve(&self, authenticator_id: &str) -> Option<Arc<dyn Authenticator>> {
        self.index
            .get(authenticator_id)
            .map(|&i| Arc::clone(&self.entries[i]))
    }

    /// Returns every registered authenticator, in registration order.
    #[must_use]
    pub fn list_all(&self) -> &[Arc<dyn Authenticator>] {
        &self.entries
    }

    /// Returns the descriptors of every registered authenticator.
    #[must_use]
    pub fn descriptors(&self) -> Vec<AuthenticatorDescriptor> {
        self.entries.iter().map(|a| a.describe().clone()).collect()
    }

    /// Returns the number of registered authenticators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if no authenticator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for AuthenticatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|a| a.id()))
            .finish()
    }
}
