//! Server assembly and run loop

use std::net::SocketAddr;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::auth::session_gate;
use crate::core::{Config, ServerState};

/// Uploaded avatars are re-encoded; allow a little headroom over the 5MB cap.
const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// HTTP request log middleware
async fn log_request(
    request: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state).
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        // Dashboard APIs
        .merge(crate::api::users::router())
        // Catalog APIs
        .merge(crate::api::products::router())
        .merge(crate::api::categories::router())
        .merge(crate::api::colors::router())
        .merge(crate::api::sizes::router())
}

/// Attach state, middleware and the static-asset fallback.
pub fn build_router(state: ServerState) -> Router {
    let public_dir = state.config.public_dir.clone();

    build_app()
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
        .fallback_service(ServeDir::new(public_dir))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server with pre-built state.
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Almara+ server listening on http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
