//! # af-session
//!
//! Flow state for authflow.
//!
//! A [`Flow`] is the server-side record of one in-progress authentication:
//! the client's echo-back values, the status machine and the attempt
//! counter. Records live in a [`FlowStore`]; [`InMemoryFlowStore`] keeps
//! them in a sharded concurrent map with per-key atomic updates.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod flow;
pub mod memory;
pub mod store;

pub use error::{FlowError, FlowResult};
pub use flow::{Flow, FlowStatus, FlowStep};
pub use memory::InMemoryFlowStore;
pub use store::FlowStore;
