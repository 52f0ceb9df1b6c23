//! Per-request forwarding context.
//!
//! [`RequestContext::derive`] reads the forwarded-host, forwarded-path and
//! use-SSL signals from the inbound headers exactly once. The result is
//! immutable and every rewrite performed while handling that request uses
//! the same value.

use std::net::IpAddr;

use axum::http::{header, HeaderMap};

use crate::config::model::{ForwardingConfig, Variant};

/// Anchored literal prefix removed from the start of a path.
///
/// An empty prefix matches only the empty string and strips nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripPrefix(String);

impl StripPrefix {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove the prefix from the start of `path`, if it is there.
    #[must_use]
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.0.as_str()).unwrap_or(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    variant: Variant,
    external_host: Option<String>,
    tls_terminated_upstream: bool,
    is_path_forwarding: bool,
    path_strip_prefix: StripPrefix,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl RequestContext {
    /// Build the context for one inbound request.
    ///
    /// `peer` is the address of the directly connected client. When the
    /// forwarding config carries a trusted-proxy allowlist and the peer is
    /// not on it, every forwarding signal is ignored.
    #[must_use]
    pub fn derive(
        headers: &HeaderMap,
        peer: Option<IpAddr>,
        variant: Variant,
        forwarding: &ForwardingConfig,
    ) -> Self {
        let names = &forwarding.headers;
        let trusted = forwarding.trusts(peer);

        if !trusted {
            tracing::warn!(
                peer = ?peer,
                "forwarding headers from untrusted peer ignored"
            );
        }

        let signal = |name: &String| {
            if trusted {
                header_str(headers, name)
            } else {
                None
            }
        };

        let forwarded_host = signal(&names.forwarded_host).filter(|h| !h.is_empty());
        let forwarded_path = signal(&names.forwarded_path);

        let tls_terminated_upstream = signal(&names.use_ssl).is_some_and(is_ssl_on);

        let (is_path_forwarding, path_strip_prefix) = match variant {
            Variant::Host => (forwarded_host.is_some(), StripPrefix::default()),
            Variant::Router => match (forwarded_host, forwarded_path) {
                (Some(_), Some(path)) => (true, StripPrefix::new(path)),
                _ => (false, StripPrefix::default()),
            },
        };

        // Without a forwarded host the application's own Host header is the
        // best external name available.
        let external_host = forwarded_host
            .or_else(|| header_str(headers, header::HOST.as_str()).filter(|h| !h.is_empty()))
            .map(String::from);

        if external_host.is_none() {
            tracing::debug!("no forwarded or inbound host, URLs keep their own host");
        }

        Self {
            variant,
            external_host,
            tls_terminated_upstream,
            is_path_forwarding,
            path_strip_prefix,
        }
    }

    /// A context that rewrites to `host` with no path forwarding.
    #[must_use]
    pub fn for_host(variant: Variant, host: impl Into<String>) -> Self {
        Self {
            variant,
            external_host: Some(host.into()),
            tls_terminated_upstream: false,
            is_path_forwarding: false,
            path_strip_prefix: StripPrefix::default(),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn external_host(&self) -> Option<&str> {
        self.external_host.as_deref()
    }

    #[must_use]
    pub const fn tls_terminated_upstream(&self) -> bool {
        self.tls_terminated_upstream
    }

    /// Whether the original client connection was encrypted.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.tls_terminated_upstream
    }

    /// Scheme the client used to reach the proxy.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.tls_terminated_upstream {
            "https"
        } else {
            "http"
        }
    }

    #[must_use]
    pub const fn is_path_forwarding(&self) -> bool {
        self.is_path_forwarding
    }

    #[must_use]
    pub const fn path_strip_prefix(&self) -> &StripPrefix {
        &self.path_strip_prefix
    }

    /// Strip the forwarded prefix from `path` when path forwarding applies.
    #[must_use]
    pub fn strip_path<'a>(&self, path: &'a str) -> &'a str {
        if self.variant.supports_path_forwarding() && self.is_path_forwarding {
            self.path_strip_prefix.strip(path)
        } else {
            path
        }
    }
}

/// `UseSSL` semantics: any value other than `off` that is not blank.
/// `"0"` counts as blank, like the PHP `empty()` check proxies were
/// configured against.
fn is_ssl_on(value: &str) -> bool {
    !matches!(value, "" | "0" | "off")
}
