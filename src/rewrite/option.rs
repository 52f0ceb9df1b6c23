//! Rewriting of the stored "home" and "site URL" option values.
//!
//! A stored value is either a plain URL string or a serialized structure.
//! The serialized form recognised here is JSON: a JSON string literal is
//! decoded, rewritten and re-encoded; in a JSON array or object every
//! string leaf that carries a host is rewritten. Anything else is
//! rewritten as a flat string.

use serde_json::Value;

use super::parts::UrlParts;
use super::rewrite_url;
use crate::context::RequestContext;

#[must_use]
pub fn rewrite_option(value: &str, ctx: &RequestContext) -> String {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::String(inner)) => {
            Value::String(rewrite_url(&inner, ctx)).to_string()
        }
        Ok(mut structured @ (Value::Array(_) | Value::Object(_))) => {
            rewrite_leaves(&mut structured, ctx);
            structured.to_string()
        }
        _ => rewrite_url(value, ctx),
    }
}

fn rewrite_leaves(value: &mut Value, ctx: &RequestContext) {
    match value {
        Value::String(s) => {
            if UrlParts::parse(s).host.is_some() {
                *s = rewrite_url(s, ctx);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_leaves(item, ctx);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                rewrite_leaves(item, ctx);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
