//! Interception points and their enable/disable registry.
//!
//! Each [`Hook`] is a stable identifier for one place where the host
//! application hands a URL value out for filtering. The
//! [`InterceptionRegistry`] holds an enabled flag for every hook bound by
//! the active variant and only ever flips the whole set at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::model::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    ContentUrl,
    HomeOption,
    SiteUrlOption,
    PluginsUrl,
    ThemeRootUrl,
    UploadDir,
    Redirect,
}

const HOST_HOOKS: &[Hook] = &[
    Hook::ContentUrl,
    Hook::HomeOption,
    Hook::SiteUrlOption,
    Hook::PluginsUrl,
    Hook::ThemeRootUrl,
    Hook::UploadDir,
];

const ROUTER_HOOKS: &[Hook] = &[
    Hook::ContentUrl,
    Hook::HomeOption,
    Hook::SiteUrlOption,
    Hook::PluginsUrl,
    Hook::ThemeRootUrl,
    Hook::UploadDir,
    Hook::Redirect,
];

impl Hook {
    /// Hooks bound by `variant`.
    #[must_use]
    pub const fn bound_by(variant: Variant) -> &'static [Self] {
        match variant {
            Variant::Host => HOST_HOOKS,
            Variant::Router => ROUTER_HOOKS,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentUrl => "content_url",
            Self::HomeOption => "home_option",
            Self::SiteUrlOption => "site_url_option",
            Self::PluginsUrl => "plugins_url",
            Self::ThemeRootUrl => "theme_root_url",
            Self::UploadDir => "upload_dir",
            Self::Redirect => "redirect",
        }
    }

    /// Hooks whose value is a stored, possibly serialized, option.
    #[must_use]
    pub const fn is_option(self) -> bool {
        matches!(self, Self::HomeOption | Self::SiteUrlOption)
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTER_HOOKS
            .iter()
            .copied()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| format!("unknown hook '{s}'"))
    }
}

#[derive(Debug, Clone)]
pub struct InterceptionRegistry {
    variant: Variant,
    enabled: BTreeMap<Hook, bool>,
}

impl InterceptionRegistry {
    /// All hooks of `variant`, enabled.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            enabled: Hook::bound_by(variant).iter().map(|h| (*h, true)).collect(),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether `hook` currently rewrites. Hooks outside the variant never do.
    #[must_use]
    pub fn is_enabled(&self, hook: Hook) -> bool {
        self.enabled.get(&hook).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn all_enabled(&self) -> bool {
        self.enabled.values().all(|on| *on)
    }

    /// Enable every hook. Returns `false` when they already were.
    pub fn enable_all(&mut self) -> bool {
        self.set_all(true)
    }

    /// Disable every hook. Returns `false` when they already were.
    pub fn disable_all(&mut self) -> bool {
        self.set_all(false)
    }

    fn set_all(&mut self, on: bool) -> bool {
        let changed = self.enabled.values().any(|state| *state != on);
        for state in self.enabled.values_mut() {
            *state = on;
        }
        tracing::debug!(
            variant = %self.variant,
            enabled = on,
            changed,
            hooks = self.enabled.len(),
            "interception hooks toggled"
        );
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_enabled() {
        let registry = InterceptionRegistry::new(Variant::Router);
        assert!(registry.all_enabled());
        for hook in Hook::bound_by(Variant::Router) {
            assert!(registry.is_enabled(*hook));
        }
    }

    #[test]
    fn redirect_is_router_only() {
        assert!(!InterceptionRegistry::new(Variant::Host).is_enabled(Hook::Redirect));
        assert!(InterceptionRegistry::new(Variant::Router).is_enabled(Hook::Redirect));
    }

    #[test]
    fn toggles_are_idempotent() {
        let mut registry = InterceptionRegistry::new(Variant::Host);
        assert!(!registry.enable_all());
        assert!(registry.disable_all());
        assert!(!registry.disable_all());
        assert!(Hook::bound_by(Variant::Host)
            .iter()
            .all(|h| !registry.is_enabled(*h)));
        assert!(registry.enable_all());
        assert!(registry.all_enabled());
    }

    #[test]
    fn enable_disable_enable_matches_single_enable() {
        let mut registry = InterceptionRegistry::new(Variant::Router);
        registry.enable_all();
        registry.disable_all();
        registry.enable_all();

        let mut single = InterceptionRegistry::new(Variant::Router);
        single.enable_all();

        for hook in Hook::bound_by(Variant::Router) {
            assert_eq!(registry.is_enabled(*hook), single.is_enabled(*hook));
        }
    }

    #[test]
    fn hook_names_round_trip_through_from_str() {
        assert_eq!("theme_root_url".parse::<Hook>(), Ok(Hook::ThemeRootUrl));
        assert!("wp_redirect".parse::<Hook>().is_err());
    }
}
