//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::fmt;
use std::time::Duration;

use af_auth::PasswordPolicy;
use af_core::FlowConfig;

use crate::router::RESERVED_PATHS;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Path of the authentication endpoint, advertised in `links`.
    pub authn_path: String,

    /// Flow lifespan in seconds.
    pub flow_lifespan: u64,

    /// Failed attempts allowed per flow.
    pub max_attempts: u32,

    /// Credential verification timeout in seconds.
    pub verify_timeout: u64,

    /// Interval between expired-flow sweeps in seconds.
    pub sweep_interval: u64,

    /// Username accepted by the basic authenticator.
    pub basic_username: String,

    /// Password accepted by the basic authenticator.
    pub basic_password: String,

    /// Argon2 memory cost in KiB for the stored password hash.
    pub password_memory_cost: u32,

    /// Argon2 iterations for the stored password hash.
    pub password_time_cost: u32,

    /// CORS allowed origins (comma-separated).
    pub cors_origins: Vec<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("AF_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("AF_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let authn_path = std::env::var("AF_AUTHN_PATH").unwrap_or_else(|_| "/authn".to_string());

        let flow_lifespan = std::env::var("AF_FLOW_LIFESPAN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600); // 10 minutes

        let max_attempts = std::env::var("AF_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let verify_timeout = std::env::var("AF_VERIFY_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let sweep_interval = std::env::var("AF_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let basic_username =
            std::env::var("AF_BASIC_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let basic_password =
            std::env::var("AF_BASIC_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        let password_memory_cost = std::env::var("AF_PASSWORD_MEMORY_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(19 * 1024);
        let password_time_cost = std::env::var("AF_PASSWORD_TIME_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let cors_origins = std::env::var("AF_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let config = Self {
            host,
            port,
            authn_path,
            flow_lifespan,
            max_attempts,
            verify_timeout,
            sweep_interval,
            basic_username,
            basic_password,
            password_memory_cost,
            password_time_cost,
            cors_origins,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            password_memory_cost: 1024,
            password_time_cost: 1,
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Checks that the configuration can run a server.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.flow_config().validate()?;
        if self.sweep_interval == 0 {
            anyhow::bail!("AF_SWEEP_INTERVAL must be positive");
        }
        if self.basic_username.is_empty() {
            anyhow::bail!("AF_BASIC_USERNAME must not be empty");
        }
        self.validate_authn_path()
    }

    /// Rejects authentication paths the router cannot mount.
    fn validate_authn_path(&self) -> anyhow::Result<()> {
        let path = self.authn_path.as_str();
        if RESERVED_PATHS.contains(&path) {
            anyhow::bail!("AF_AUTHN_PATH '{path}' collides with a built-in route");
        }
        let wildcard = path.contains(['{', '}', '*'])
            || path.split('/').any(|segment| segment.starts_with(':'));
        if wildcard {
            anyhow::bail!("AF_AUTHN_PATH '{path}' must be a literal path");
        }
        Ok(())
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            max_attempts: self.max_attempts,
            flow_lifespan: self.flow_lifespan,
            verify_timeout_ms: self.verify_timeout.saturating_mul(1000),
            authn_path: self.authn_path.clone(),
        }
    }

    /// Returns the hashing policy for configured passwords.
    #[must_use]
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new()
            .memory_cost(self.password_memory_cost)
            .time_cost(self.password_time_cost)
    }

    /// Returns the sweep interval.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            authn_path: "/authn".to_string(),
            flow_lifespan: 600,
            max_attempts: 3,
            verify_timeout: 5,
            sweep_interval: 60,
            basic_username: "admin".to_string(),
            basic_password: "admin".to_string(),
            password_memory_cost: 19 * 1024,
            password_time_cost: 2,
            cors_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("authn_path", &self.authn_path)
            .field("flow_lifespan", &self.flow_lifespan)
            .field("max_attempts", &self.max_attempts)
            .field("verify_timeout", &self.verify_timeout)
            .field("sweep_interval", &self.sweep_interval)
            .field("basic_username", &self.basic_username)
            .field("basic_password", &"<redacted>")
            .field("password_memory_cost", &self.password_memory_cost)
            .field("password_time_cost", &self.password_time_cost)
            .field("cors_origins", &self.cors_origins)
            .field("log_level", &self.log_level)
            .finish()
    }
}
