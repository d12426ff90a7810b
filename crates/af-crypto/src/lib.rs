//! # af-crypto
//!
//! Cryptographic helpers for authflow.
//!
//! Authorization codes are minted here from the thread-local CSPRNG, and
//! secret comparisons go through [`constant_time_eq`].

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod random;

pub use random::{constant_time_eq, generate_auth_code};
