//! Serde data structures for the Portly configuration file.
//!
//! Contains [`Config`] (the root), [`Variant`], [`ForwardingConfig`],
//! [`HeaderNames`], and [`SiteConfig`]. All types derive `Serialize` and
//! `Deserialize` with `deny_unknown_fields` for strict parsing.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FORWARDED_HOST: &str = "x-forwarded-host";
pub const DEFAULT_FORWARDED_PATH: &str = "x-forwarded-path";
pub const DEFAULT_USE_SSL: &str = "usessl";

fn default_forwarded_host() -> String {
    DEFAULT_FORWARDED_HOST.to_string()
}

fn default_forwarded_path() -> String {
    DEFAULT_FORWARDED_PATH.to_string()
}

fn default_use_ssl() -> String {
    DEFAULT_USE_SSL.to_string()
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_default_variant(v: &Variant) -> bool {
    *v == Variant::default()
}

fn is_default_forwarding(v: &ForwardingConfig) -> bool {
    v.headers.is_default() && v.trusted_proxies.is_empty()
}

/// Which flavour of the rewriting engine is active.
///
/// `Host` only swaps the host component. `Router` also strips the
/// forwarded path prefix and intercepts redirect targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Host,
    #[default]
    Router,
}

impl Variant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Router => "router",
        }
    }

    #[must_use]
    pub const fn supports_path_forwarding(self) -> bool {
        matches!(self, Self::Router)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_variant")]
    pub variant: Variant,

    /// Set when the early bootstrap script is installed ahead of normal
    /// extension loading. Enables cookie-path derivation and request-path
    /// normalization (router variant only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub early_bootstrap: bool,

    #[serde(default, skip_serializing_if = "is_default_forwarding")]
    pub forwarding: ForwardingConfig,

    #[serde(default, skip_serializing_if = "SiteConfig::is_default")]
    pub site: SiteConfig,
}

impl Config {
    /// True when the early-bootstrap behaviour applies to this config.
    #[must_use]
    pub fn bootstrap_active(&self) -> bool {
        self.early_bootstrap && self.variant.supports_path_forwarding()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardingConfig {
    #[serde(default, skip_serializing_if = "HeaderNames::is_default")]
    pub headers: HeaderNames,

    /// Peers allowed to supply forwarding headers. Empty trusts every peer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_proxies: Vec<IpAddr>,
}

impl ForwardingConfig {
    /// Whether forwarding headers from `peer` should be honoured.
    ///
    /// With an allowlist configured, an unknown peer (including a request
    /// whose peer address is not known at all) is not trusted.
    #[must_use]
    pub fn trusts(&self, peer: Option<IpAddr>) -> bool {
        if self.trusted_proxies.is_empty() {
            return true;
        }
        peer.is_some_and(|ip| self.trusted_proxies.contains(&ip))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderNames {
    #[serde(default = "default_forwarded_host")]
    pub forwarded_host: String,

    #[serde(default = "default_forwarded_path")]
    pub forwarded_path: String,

    #[serde(default = "default_use_ssl")]
    pub use_ssl: String,
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            forwarded_host: default_forwarded_host(),
            forwarded_path: default_forwarded_path(),
            use_ssl: default_use_ssl(),
        }
    }
}

impl HeaderNames {
    fn is_default(&self) -> bool {
        self.forwarded_host == DEFAULT_FORWARDED_HOST
            && self.forwarded_path == DEFAULT_FORWARDED_PATH
            && self.use_ssl == DEFAULT_USE_SSL
    }
}

/// Canonical "home" and "site URL" values as stored by the application.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl SiteConfig {
    fn is_default(&self) -> bool {
        self.home.is_none() && self.site_url.is_none()
    }
}
