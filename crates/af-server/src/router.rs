//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use af_protocol::endpoints::{AUTHORIZE_PATH, flow_router};
use af_session::InMemoryFlowStore;

use crate::state::AppState;

/// Server information path.
pub const ROOT_PATH: &str = "/";

/// Health check path.
pub const HEALTH_PATH: &str = "/health";

/// Liveness probe path.
pub const LIVENESS_PATH: &str = "/health/live";

/// Readiness probe path.
pub const READINESS_PATH: &str = "/health/ready";

/// Paths the authentication endpoint must not be mounted on.
pub const RESERVED_PATHS: [&str; 5] = [
    ROOT_PATH,
    AUTHORIZE_PATH,
    HEALTH_PATH,
    LIVENESS_PATH,
    READINESS_PATH,
];

/// Creates the main application router.
///
/// The configuration must have passed [`ServerConfig::validate`](crate::ServerConfig::validate);
/// an authentication path that overlaps a built-in route makes Axum panic.
pub fn create_router(state: AppState) -> Router {
    let flows = flow_router::<InMemoryFlowStore>(&state.config.authn_path)
        .with_state(state.flow_state());

    let health = Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(LIVENESS_PATH, get(liveness_check))
        .route(READINESS_PATH, get(readiness_check))
        .with_state(state.clone());

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(flows)
        .merge(health)
        .route(ROOT_PATH, get(root))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Builds the CORS layer; `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: "authflow".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Server information response.
#[derive(Serialize)]
pub struct ServerInfo {
    name: String,
    version: String,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Kubernetes liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe: ready once an authenticator is registered.
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.engine.registry().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}
