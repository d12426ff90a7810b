//! Flow engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration consumed by the flow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Failed verification attempts allowed per flow.
    pub max_attempts: u32,
    /// Lifetime of a flow record, in seconds.
    pub flow_lifespan: u64,
    /// Upper bound on a single credential verification, in milliseconds.
    pub verify_timeout_ms: u64,
    /// Path advertised in the `links` array for continuing a flow.
    pub authn_path: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            flow_lifespan: 600, // 10 minutes
            verify_timeout_ms: 5_000,
            authn_path: "/authn".to_string(),
        }
    }
}

impl FlowConfig {
    /// Returns the flow lifetime.
    #[must_use]
    pub const fn flow_lifespan(&self) -> Duration {
        Duration::from_secs(self.flow_lifespan)
    }

    /// Returns the verification timeout.
    #[must_use]
    pub const fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }

    /// Checks that the configuration can drive a flow.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if a knob is zero or the path is not absolute.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Validation("max_attempts must be at least 1".to_string()));
        }
        if self.flow_lifespan == 0 {
            return Err(Error::Validation("flow_lifespan must be positive".to_string()));
        }
        if self.verify_timeout_ms == 0 {
            return Err(Error::Validation("verify_timeout must be positive".to_string()));
        }
        if !self.authn_path.starts_with('/') {
            return Err(Error::Validation(format!(
                "authn_path must start with '/': {}",
                self.authn_path
            )));
        }
        Ok(())
    }
}
