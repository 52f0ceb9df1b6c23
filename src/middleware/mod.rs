//! Tower middleware deriving the forwarding context.
//!
//! [`forwarded_context`] wraps the whole router, so it runs before routing.
//! It derives the [`RequestContext`] once from the inbound headers and the
//! peer address, stores it in the request extensions together with a
//! [`CorrelationId`], and, when the early bootstrap is active, strips the
//! forwarded prefix from the request path before it is matched.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, Uri};
use axum::middleware::Next;
use axum::response::Response;

use crate::bootstrap;
use crate::context::RequestContext;
use crate::server::AppState;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

pub async fn forwarded_context(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let config = &state.config;
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let correlation_id = req
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    if !config.forwarding.trusts(peer) {
        state.stats.untrusted_peers.fetch_add(1, Ordering::Relaxed);
    }

    let ctx = RequestContext::derive(
        req.headers(),
        peer,
        config.variant,
        &config.forwarding,
    );

    tracing::debug!(
        correlation_id = %correlation_id,
        external_host = ?ctx.external_host(),
        secure = ctx.is_secure(),
        path_forwarding = ctx.is_path_forwarding(),
        "request context derived"
    );

    if config.bootstrap_active() {
        if let Some(uri) = strip_forwarded_prefix(req.uri(), &ctx) {
            tracing::debug!(
                correlation_id = %correlation_id,
                from = %req.uri(),
                to = %uri,
                "request path normalized"
            );
            *req.uri_mut() = uri;
        }
    }

    state.stats.requests.fetch_add(1, Ordering::Relaxed);
    req.extensions_mut().insert(ctx);
    req.extensions_mut()
        .insert(CorrelationId(correlation_id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

/// The request URI without the forwarded prefix, or `None` if unchanged.
fn strip_forwarded_prefix(uri: &Uri, ctx: &RequestContext) -> Option<Uri> {
    let path = uri.path();
    let stripped = bootstrap::normalize_request_path(path, ctx);
    if stripped.len() == path.len() {
        return None;
    }

    let mut path_and_query = if stripped.starts_with('/') {
        stripped.to_string()
    } else {
        format!("/{stripped}")
    };
    if let Some(query) = uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;

    use super::*;
    use crate::config::model::{ForwardingConfig, Variant};

    fn ctx(prefix: &'static str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-host", "shop.example.com".parse().unwrap());
        headers.insert("x-forwarded-path", prefix.parse().unwrap());
        RequestContext::derive(&headers, None, Variant::Router, &ForwardingConfig::default())
    }

    #[test]
    fn strips_prefix_and_keeps_query() {
        let uri: Uri = "/app/wp-admin/options.php?page=1".parse().unwrap();
        let out = strip_forwarded_prefix(&uri, &ctx("/app")).unwrap();
        assert_eq!(out, "/wp-admin/options.php?page=1");
    }

    #[test]
    fn whole_path_prefix_leaves_root() {
        let uri: Uri = "/app".parse().unwrap();
        let out = strip_forwarded_prefix(&uri, &ctx("/app")).unwrap();
        assert_eq!(out.path(), "/");
    }

    #[test]
    fn unrelated_path_is_untouched() {
        let uri: Uri = "/other/page".parse().unwrap();
        assert!(strip_forwarded_prefix(&uri, &ctx("/app")).is_none());
    }
}
