//! `POST /rewrite`: run host-application values through the engine.
//!
//! The request body is an ordered list of steps, each either a filter
//! (hook + value) or a lifecycle event. All steps of one request share a
//! single request-scoped [`Interceptor`], so a settings screen window
//! opened by an event affects exactly the filters that follow it in the
//! same request and nothing else.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{LifecycleEvent, Transition, WindowState};
use crate::bootstrap::CookiePaths;
use crate::context::RequestContext;
use crate::engine::Interceptor;
use crate::hooks::Hook;
use crate::middleware::CorrelationId;
use crate::rewrite::UploadDir;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Filter { filter: Hook, value: Value },
    Event { event: LifecycleEvent },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextView {
    pub external_host: Option<String>,
    pub secure: bool,
    pub scheme: String,
    pub path_forwarding: bool,
    pub strip_prefix: String,
}

impl From<&RequestContext> for ContextView {
    fn from(ctx: &RequestContext) -> Self {
        Self {
            external_host: ctx.external_host().map(String::from),
            secure: ctx.is_secure(),
            scheme: ctx.scheme().to_string(),
            path_forwarding: ctx.is_path_forwarding(),
            strip_prefix: ctx.path_strip_prefix().as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StepResult {
    Filter { filter: Hook, value: Value },
    Event { event: LifecycleEvent, transition: Transition },
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub context: ContextView,
    pub results: Vec<StepResult>,
    pub window: WindowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_paths: Option<CookiePaths>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unprocessable(message: String) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub async fn rewrite_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Extension(CorrelationId(correlation_id)): Extension<CorrelationId>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, ApiError> {
    let mut engine = Interceptor::new(ctx);
    let mut results = Vec::with_capacity(request.steps.len());
    let mut rewritten = 0_u64;

    for (idx, step) in request.steps.into_iter().enumerate() {
        match step {
            Step::Event { event } => {
                let transition = engine.dispatch(event);
                results.push(StepResult::Event { event, transition });
            }
            Step::Filter { filter, value } => {
                let out = apply_filter(&engine, filter, value).map_err(|message| {
                    tracing::warn!(
                        correlation_id = %correlation_id,
                        step = idx,
                        hook = %filter,
                        error = %message,
                        "rejected rewrite step"
                    );
                    ApiError::unprocessable(format!("steps[{idx}]: {message}"))
                })?;
                if engine.registry().is_enabled(filter) {
                    rewritten += 1;
                }
                results.push(StepResult::Filter { filter, value: out });
            }
        }
    }

    state
        .stats
        .values_rewritten
        .fetch_add(rewritten, Ordering::Relaxed);

    let config = &state.config;
    let cookie_paths = if config.bootstrap_active() {
        match (&config.site.home, &config.site.site_url) {
            (Some(home), Some(site_url)) => Some(engine.cookie_paths(home, site_url)),
            (Some(home), None) => Some(engine.cookie_paths(home, home)),
            (None, Some(site_url)) => Some(engine.cookie_paths(site_url, site_url)),
            (None, None) => None,
        }
    } else {
        None
    };

    tracing::info!(
        correlation_id = %correlation_id,
        steps = results.len(),
        rewritten,
        "rewrite batch processed"
    );

    Ok(Json(RewriteResponse {
        context: ContextView::from(engine.context()),
        results,
        window: engine.window_state(),
        cookie_paths,
    }))
}

fn apply_filter(engine: &Interceptor, hook: Hook, value: Value) -> Result<Value, String> {
    if hook == Hook::UploadDir {
        let dir: UploadDir = serde_json::from_value(value)
            .map_err(|e| format!("upload_dir value must be an object with url and baseurl: {e}"))?;
        let dir = engine.filter_upload_dir(dir);
        return serde_json::to_value(dir).map_err(|e| e.to_string());
    }

    match value {
        Value::String(s) => Ok(Value::String(engine.filter_url(hook, &s))),
        other => Err(format!("{hook} value must be a string, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::Variant;

    #[test]
    fn steps_deserialize_as_filters_or_events() {
        let request: RewriteRequest = serde_json::from_value(serde_json::json!({
            "steps": [
                { "filter": "content_url", "value": "http://internal.local/x" },
                { "event": "settings_screen_load" }
            ]
        }))
        .unwrap();
        assert!(matches!(
            request.steps[0],
            Step::Filter { filter: Hook::ContentUrl, .. }
        ));
        assert!(matches!(
            request.steps[1],
            Step::Event { event: LifecycleEvent::SettingsScreenLoad }
        ));
    }

    #[test]
    fn non_string_url_value_is_rejected() {
        let engine = Interceptor::new(RequestContext::for_host(Variant::Host, "shop.example.com"));
        let err = apply_filter(&engine, Hook::ContentUrl, serde_json::json!(42)).unwrap_err();
        assert!(err.contains("must be a string"));
    }

    #[test]
    fn upload_dir_requires_both_urls() {
        let engine = Interceptor::new(RequestContext::for_host(Variant::Host, "shop.example.com"));
        let err = apply_filter(
            &engine,
            Hook::UploadDir,
            serde_json::json!({ "url": "http://internal.local/u" }),
        )
        .unwrap_err();
        assert!(err.contains("upload_dir"));
    }
}
