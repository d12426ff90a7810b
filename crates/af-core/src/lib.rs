//! # af-core
//!
//! Core types shared by every authflow crate.
//!
//! This crate provides the error catalog used on the wire, the audit event
//! model, and the configuration knobs consumed by the flow engine.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::FlowConfig;
pub use error::{Error, ErrorKind, Result};
pub use event::{Event, EventOutcome, EventType};
