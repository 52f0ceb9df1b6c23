//! Behaviour enabled by the early bootstrap script (router variant).
//!
//! Installing the script itself is plain file management done by the host
//! application. Once it is in place, two extra adjustments apply: cookie
//! paths are derived from the rewritten home and site URLs, and the
//! inbound request path loses the forwarded prefix so the application
//! never builds links containing it.

use serde::Serialize;

use crate::context::RequestContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookiePaths {
    pub cookie_path: String,
    pub site_cookie_path: String,
}

/// Cookie paths for the (already rewritten) home and site URLs.
#[must_use]
pub fn cookie_paths(home: &str, site_url: &str) -> CookiePaths {
    CookiePaths {
        cookie_path: cookie_path(home),
        site_cookie_path: cookie_path(site_url),
    }
}

/// `value + "/"` with a leading `http(s)://authority` removed.
///
/// Only the leading origin goes. An `http://` appearing later in the value
/// (say, inside a query string) is kept as is; home and site URLs carry a
/// single origin, so for them this is the same as removing every match.
fn cookie_path(value: &str) -> String {
    let with_slash = format!("{value}/");
    strip_http_origin(&with_slash).to_string()
}

fn strip_http_origin(value: &str) -> &str {
    let rest = ["https://", "http://"].iter().find_map(|scheme| {
        value
            .get(..scheme.len())
            .filter(|head| head.eq_ignore_ascii_case(scheme))
            .map(|_| &value[scheme.len()..])
    });

    match rest {
        // The origin must name at least one authority character.
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => {
            rest.find('/').map_or("", |idx| &rest[idx..])
        }
        _ => value,
    }
}

/// Strip the forwarded prefix from an inbound request path.
#[must_use]
pub fn normalize_request_path<'a>(path: &'a str, ctx: &RequestContext) -> &'a str {
    ctx.strip_path(path)
}
