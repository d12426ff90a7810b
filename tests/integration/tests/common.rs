//! Common test utilities and fixtures.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::sleep;

use af_server::{Server, ServerConfig};

/// Id of the built-in username/password authenticator.
pub const BASIC_AUTHENTICATOR_ID: &str = "QmFzaWNBdXRoZW50aWNhdG9yOkxPQ0FM";

/// Redirect URI registered by every test flow.
pub const REDIRECT_URI: &str = "https://app.example.com/callback";

/// Test environment that manages a running server.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client for testing.
    pub client: Client,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a server with the testing configuration.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(ServerConfig::for_testing()).await
    }

    /// Starts a server with a custom configuration.
    pub async fn with_config(config: ServerConfig) -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("af_server=debug,af_protocol=debug")
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = Server::new(config)?;
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown requested");
            };
            if let Err(e) = server.serve(listener, shutdown).await {
                tracing::error!("Server error: {}", e);
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            base_url,
            client,
            _shutdown_tx,
        })
    }

    /// Returns the URL for a path on the server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Starts a flow and returns its id.
    pub async fn start_flow(&self, state: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(self.url("/authorize"))
            .query(&[
                ("response_type", "code"),
                ("client_id", "test-client"),
                ("response_mode", "direct"),
                ("redirect_uri", REDIRECT_URI),
                ("state", state),
            ])
            .send()
            .await?;
        anyhow::ensure!(
            response.status().is_success(),
            "authorize failed with {}",
            response.status()
        );

        let body: Value = response.json().await?;
        body["flowId"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("authorize response has no flowId: {body}"))
    }

    /// Submits username/password credentials for a flow.
    pub async fn submit(
        &self,
        flow_id: &str,
        username: &str,
        password: &str,
    ) -> anyhow::Result<(u16, Value)> {
        self.post_authn(&json!({
            "flowId": flow_id,
            "selectedAuthenticator": {
                "authenticatorId": BASIC_AUTHENTICATOR_ID,
                "params": {"username": username, "password": password}
            }
        }))
        .await
    }

    /// Posts a raw JSON body to the authentication endpoint.
    pub async fn post_authn(&self, body: &Value) -> anyhow::Result<(u16, Value)> {
        let response = self.client.post(self.url("/authn")).json(body).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }
}

/// Waits for the server to be ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{}/health/ready", base_url);
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Server not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}
