//! `portly rewrite`: run values through the engine from the command line.
//!
//! Builds the same header map a proxy would send, derives the request
//! context from it, and prints one rewritten value per line. Values for
//! the `upload_dir` hook are JSON objects with `url` and `baseurl`.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::cli::RewriteArgs;
use crate::config::model::{ForwardingConfig, Variant};
use crate::context::RequestContext;
use crate::engine::Interceptor;
use crate::error::PortlyError;
use crate::hooks::Hook;
use crate::rewrite::UploadDir;

pub fn execute(args: &RewriteArgs) -> Result<(), PortlyError> {
    let forwarding = ForwardingConfig::default();
    let headers = build_headers(args, &forwarding);
    let variant: Variant = args.variant.into();
    let ctx = RequestContext::derive(&headers, None, variant, &forwarding);
    let engine = Interceptor::new(ctx);

    for value in &args.values {
        println!("{}", rewrite_value(&engine, args.hook, value)?);
    }
    Ok(())
}

fn rewrite_value(engine: &Interceptor, hook: Hook, value: &str) -> Result<String, PortlyError> {
    if hook != Hook::UploadDir {
        return Ok(engine.filter_url(hook, value));
    }

    let invalid = |e: serde_json::Error| PortlyError::InvalidValue {
        hook: hook.to_string(),
        message: format!("expected a JSON object with url and baseurl ({e})"),
    };
    let dir: UploadDir = serde_json::from_str(value).map_err(invalid)?;
    serde_json::to_string(&engine.filter_upload_dir(dir)).map_err(invalid)
}

fn build_headers(args: &RewriteArgs, forwarding: &ForwardingConfig) -> HeaderMap {
    let names = &forwarding.headers;
    let mut headers = HeaderMap::new();

    let signals = [
        (&names.forwarded_host, &args.forwarded_host),
        (&names.forwarded_path, &args.forwarded_path),
        (&names.use_ssl, &args.use_ssl),
    ];

    for (name, value) in signals {
        let Some(value) = value else { continue };
        match (name.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => {
                eprintln!("warning: ignoring invalid value for {name}: {value:?}");
            }
        }
    }

    headers
}
