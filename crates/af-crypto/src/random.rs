//! Cryptographically secure random number generation.
//!
//! This module provides secure random generation for authorization codes
//! and other opaque identifiers handed to clients.

use rand::distr::{Alphanumeric, SampleString};

/// Length of a minted authorization code.
pub const AUTH_CODE_LEN: usize = 32;

/// Generates a cryptographically secure random string.
///
/// The string contains alphanumeric characters (a-z, A-Z, 0-9).
///
/// # Arguments
///
/// * `len` - Length of the string to generate
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a secure random authorization code.
///
/// Creates a 32-character alphanumeric code.
///
/// # Security
///
/// The code has approximately 190 bits of entropy (log2(62^32)),
/// exceeding the minimum 128 bits recommended by RFC 6749.
#[must_use]
pub fn generate_auth_code() -> String {
    random_alphanumeric(AUTH_CODE_LEN)
}

/// Constant-time comparison of two byte slices.
///
/// The running time depends only on the slice lengths, not on where the
/// first differing byte is.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
