//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding config, stats,
//! and uptime), [`build_router`] for constructing the Axum router with
//! middleware layers, and [`shutdown_signal`] for SIGTERM / Ctrl+C
//! handling. Per-request rewriting state never lives here: every request
//! builds its own [`Interceptor`](crate::engine::Interceptor).

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower::{Layer, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api::rewrite_handler;
use crate::config::model::Config;
use crate::health::health_handler;
use crate::middleware::forwarded_context;

#[derive(Debug)]
pub struct Stats {
    pub requests: AtomicU64,
    pub values_rewritten: AtomicU64,
    pub untrusted_peers: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            values_rewritten: AtomicU64::new(0),
            untrusted_peers: AtomicU64::new(0),
        }
    }
}

pub struct AppState {
    pub config: Arc<Config>,
    pub source_name: String,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, source_name: impl Into<String>) -> Self {
        Self {
            config: Arc::new(config),
            source_name: source_name.into(),
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    let routes: Router = Router::new()
        .route("/health", get(health_handler))
        .route("/rewrite", post(rewrite_handler))
        .with_state(Arc::clone(&state));

    // Wraps the routes as a whole so a normalized request path is matched
    // against them. `Router::layer` would only run after routing.
    let forwarded = middleware::from_fn_with_state(state, forwarded_context).layer(routes);

    Router::new().fallback_service(forwarded).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(max_body)),
    )
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
