//! URL rewriting against a [`RequestContext`].
//!
//! [`rewrite_url`] swaps the host of any URL for the external host and, in
//! the router variant, removes the forwarded path prefix. Scheme,
//! credentials, query and fragment are carried over byte for byte.
//! Submodules handle decomposition ([`parts`]) and stored option values
//! that may be serialized ([`option`]).

pub mod option;
pub mod parts;

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use parts::UrlParts;

pub use option::rewrite_option;

/// Rewrite a single URL for the external origin.
///
/// Never fails. When the context carries no external host the URL keeps
/// its own host. A missing path is treated as empty before stripping.
#[must_use]
pub fn rewrite_url(url: &str, ctx: &RequestContext) -> String {
    let mut parts = UrlParts::parse(url);

    if let Some(host) = ctx.external_host() {
        parts.host = Some(host);
    }

    let path = ctx.strip_path(parts.path.unwrap_or(""));
    parts.path = (!path.is_empty()).then_some(path);

    parts.to_string()
}

/// Upload directory description produced by the host application.
///
/// Only `url` and `baseurl` are rewritten; every other field is kept as is.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadDir {
    pub url: String,
    pub baseurl: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[must_use]
pub fn rewrite_upload_dir(mut dir: UploadDir, ctx: &RequestContext) -> UploadDir {
    dir.url = rewrite_url(&dir.url, ctx);
    dir.baseurl = rewrite_url(&dir.baseurl, ctx);
    dir
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;

    use super::*;
    use crate::config::model::{ForwardingConfig, Variant};

    fn forwarding_ctx(variant: Variant, path: &'static str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-host", "shop.example.com".parse().unwrap());
        headers.insert("x-forwarded-path", path.parse().unwrap());
        RequestContext::derive(&headers, None, variant, &ForwardingConfig::default())
    }

    #[test]
    fn replaces_host_only() {
        let ctx = RequestContext::for_host(Variant::Host, "shop.example.com");
        assert_eq!(
            rewrite_url("http://internal.local/wp-content/theme.css", &ctx),
            "http://shop.example.com/wp-content/theme.css"
        );
    }

    #[test]
    fn keeps_credentials_query_and_fragment() {
        let ctx = RequestContext::for_host(Variant::Router, "shop.example.com");
        assert_eq!(
            rewrite_url("https://ann:pw@internal.local:8080/p?q=1#f", &ctx),
            "https://ann:pw@shop.example.com/p?q=1#f"
        );
    }

    #[test]
    fn root_relative_gets_host_without_scheme() {
        let ctx = RequestContext::for_host(Variant::Host, "shop.example.com");
        assert_eq!(rewrite_url("/uploads/a.png", &ctx), "shop.example.com/uploads/a.png");
    }

    #[test]
    fn host_only_url_reassembles() {
        let ctx = RequestContext::for_host(Variant::Host, "shop.example.com");
        assert_eq!(rewrite_url("http://internal.local", &ctx), "http://shop.example.com");
    }

    #[test]
    fn router_strips_forwarded_prefix() {
        let ctx = forwarding_ctx(Variant::Router, "/app");
        assert_eq!(
            rewrite_url("http://internal.local/app/page?x=1", &ctx),
            "http://shop.example.com/page?x=1"
        );
        assert_eq!(
            rewrite_url("http://internal.local/other", &ctx),
            "http://shop.example.com/other"
        );
    }

    #[test]
    fn router_strip_to_empty_path() {
        let ctx = forwarding_ctx(Variant::Router, "/app");
        assert_eq!(rewrite_url("http://internal.local/app", &ctx), "http://shop.example.com");
    }

    #[test]
    fn host_variant_never_strips() {
        let ctx = forwarding_ctx(Variant::Host, "/app");
        assert_eq!(
            rewrite_url("http://internal.local/app/page", &ctx),
            "http://shop.example.com/app/page"
        );
    }

    #[test]
    fn unknown_external_host_keeps_original() {
        let ctx = RequestContext::derive(
            &HeaderMap::new(),
            None,
            Variant::Router,
            &ForwardingConfig::default(),
        );
        assert_eq!(
            rewrite_url("http://internal.local/a", &ctx),
            "http://internal.local/a"
        );
    }

    #[test]
    fn upload_dir_rewrites_both_urls_and_keeps_the_rest() {
        let ctx = RequestContext::for_host(Variant::Router, "shop.example.com");
        let dir: UploadDir = serde_json::from_value(serde_json::json!({
            "url": "http://internal.local/uploads",
            "baseurl": "http://internal.local/uploads",
            "subdir": "/2024/05",
            "error": false
        }))
        .unwrap();

        let out = rewrite_upload_dir(dir, &ctx);
        assert_eq!(out.url, "http://shop.example.com/uploads");
        assert_eq!(out.baseurl, "http://shop.example.com/uploads");
        assert_eq!(out.extra["subdir"], "/2024/05");
        assert_eq!(out.extra["error"], false);
    }
}
