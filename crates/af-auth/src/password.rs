//! Password hashing and verification using Argon2id.
//!
//! Implements NIST SP 800-63B password recommendations:
//! - Argon2id for memory-hard hashing
//! - Secure random salt generation
//! - Constant-time comparison
//!
//! Hashing is CPU-bound; async callers should run it on the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::{AuthError, AuthResult};

/// Password hashing configuration.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
    /// Output hash length.
    pub hash_length: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        // OWASP recommended settings for Argon2id
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

impl PasswordPolicy {
    /// Creates a new password policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the memory cost in KiB.
    #[must_use]
    pub const fn memory_cost(mut self, kib: u32) -> Self {
        self.memory_cost = kib;
        self
    }

    /// Sets the time cost (iterations).
    #[must_use]
    pub const fn time_cost(mut self, iterations: u32) -> Self {
        self.time_cost = iterations;
        self
    }

    #[allow(clippy::missing_const_for_fn)] // Params::new is not const
    fn build_params(&self) -> Result<Params, argon2::Error> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.hash_length as usize),
        )
    }
}

/// Password hasher using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasherService {
    policy: PasswordPolicy,
}

impl PasswordHasherService {
    /// Creates a new password hasher with the given policy.
    #[must_use]
    pub const fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Creates a new password hasher with default policy.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PasswordPolicy::default())
    }

    /// Hashes a password.
    ///
    /// Returns the PHC-formatted hash string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the policy is invalid or hashing fails.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let params = self
            .policy
            .build_params()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies a password against a PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the stored hash is malformed.
    pub fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::Internal(e.to_string()))?;

        // Argon2::default() can verify any Argon2 variant
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Internal(e.to_string())),
        }
    }
}

impl Default for PasswordHasherService {
    fn default() -> Self {
        Self::with_defaults()
    }
}
