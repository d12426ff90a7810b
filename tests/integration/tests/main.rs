//! End-to-End Integration Tests
//!
//! These tests drive a real authflow server over HTTP.

mod common;
mod auth_flows;
