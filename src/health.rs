//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, config source metadata, the active variant, and
//! cumulative request statistics. The context derived for the health
//! request itself is echoed back, which makes it a quick way to check
//! what a proxy actually forwards.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::ContextView;
use crate::context::RequestContext;
use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub config: ConfigHealth,
    pub request: ContextView,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub variant: String,
    pub early_bootstrap: bool,
    pub trusted_proxies: usize,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests: u64,
    pub values_rewritten: u64,
    pub untrusted_peers: u64,
}

pub async fn health_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Json<HealthResponse> {
    let config = &state.config;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        config: ConfigHealth {
            source: state.source_name.clone(),
            variant: config.variant.to_string(),
            early_bootstrap: config.bootstrap_active(),
            trusted_proxies: config.forwarding.trusted_proxies.len(),
        },
        request: ContextView::from(&ctx),
        stats: StatsResponse {
            requests: state.stats.requests.load(Ordering::Relaxed),
            values_rewritten: state.stats.values_rewritten.load(Ordering::Relaxed),
            untrusted_peers: state.stats.untrusted_peers.load(Ordering::Relaxed),
        },
    })
}
