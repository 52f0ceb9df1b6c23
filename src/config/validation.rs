//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as malformed or clashing header names, an early-bootstrap
//! flag on a variant that cannot honour it, unparseable canonical site
//! URLs, and duplicate trusted proxies. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use std::collections::HashSet;

use http::HeaderName;
use url::Url;

use super::model::{Config, Variant};
use crate::error::ValidationError;

/// Validate a single header name. Returns `Ok(())` or a human-readable error.
pub fn validate_header_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("header name cannot be empty".into());
    }
    name.parse::<HeaderName>()
        .map(|_| ())
        .map_err(|_| format!("'{name}' is not a valid header name"))
}

/// Validate a canonical site URL. Returns `Ok(())` or a human-readable error.
pub fn validate_site_url(value: &str) -> Result<(), String> {
    match Url::parse(value) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{value}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{value}' is not a valid URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let headers = &config.forwarding.headers;
    let named = [
        ("forwarding.headers.forwarded_host", &headers.forwarded_host),
        ("forwarding.headers.forwarded_path", &headers.forwarded_path),
        ("forwarding.headers.use_ssl", &headers.use_ssl),
    ];

    let mut seen_headers = HashSet::new();
    for (field, name) in named {
        if let Err(msg) = validate_header_name(name) {
            let cleaned: String = name
                .trim()
                .chars()
                .map(|c| if c.is_whitespace() { '-' } else { c })
                .collect();
            errors.push(ValidationError {
                field: field.into(),
                message: msg,
                suggestion: if cleaned.is_empty() || cleaned == *name {
                    None
                } else {
                    Some(format!("did you mean '{cleaned}'?"))
                },
            });
            continue;
        }
        if !seen_headers.insert(name.to_ascii_lowercase()) {
            errors.push(ValidationError {
                field: field.into(),
                message: format!("header '{name}' is already used by another signal"),
                suggestion: None,
            });
        }
    }

    if config.early_bootstrap && config.variant == Variant::Host {
        errors.push(ValidationError {
            field: "early_bootstrap".into(),
            message: "early bootstrap is only supported by the router variant".into(),
            suggestion: Some("set 'variant: router' or remove 'early_bootstrap'".into()),
        });
    }

    let site = &config.site;
    for (field, value) in [("site.home", &site.home), ("site.site_url", &site.site_url)] {
        if let Some(value) = value {
            if let Err(msg) = validate_site_url(value) {
                errors.push(ValidationError {
                    field: field.into(),
                    message: msg,
                    suggestion: if value.contains("://") {
                        None
                    } else {
                        Some(format!("did you mean 'http://{value}'?"))
                    },
                });
            }
        }
    }

    let mut seen_proxies = HashSet::new();
    for proxy in &config.forwarding.trusted_proxies {
        if !seen_proxies.insert(proxy) {
            errors.push(ValidationError {
                field: "forwarding.trusted_proxies".into(),
                message: format!("duplicate trusted proxy {proxy}"),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let headers = &config.forwarding.headers;
    let proxies = if config.forwarding.trusted_proxies.is_empty() {
        "any peer".to_string()
    } else {
        config
            .forwarding
            .trusted_proxies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let lines = [
        format!("  variant: {}", config.variant),
        format!(
            "  early bootstrap: {}",
            if config.bootstrap_active() { "on" } else { "off" }
        ),
        format!(
            "  headers: host={}, path={}, ssl={}",
            headers.forwarded_host, headers.forwarded_path, headers.use_ssl
        ),
        format!("  trusted proxies: {proxies}"),
    ];

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ForwardingConfig, HeaderNames, SiteConfig};

    #[test]
    fn default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn header_with_space_suggests_dash() {
        let config = Config {
            forwarding: ForwardingConfig {
                headers: HeaderNames {
                    use_ssl: "use ssl".into(),
                    ..HeaderNames::default()
                },
                trusted_proxies: vec![],
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "forwarding.headers.use_ssl");
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean 'use-ssl'?"));
    }

    #[test]
    fn clashing_headers_fail() {
        let config = Config {
            forwarding: ForwardingConfig {
                headers: HeaderNames {
                    forwarded_path: "X-Forwarded-Host".into(),
                    ..HeaderNames::default()
                },
                trusted_proxies: vec![],
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("already used")));
    }

    #[test]
    fn early_bootstrap_on_host_variant_fails() {
        let config = Config {
            variant: Variant::Host,
            early_bootstrap: true,
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "early_bootstrap"));
    }

    #[test]
    fn site_url_without_scheme_suggests_http() {
        let config = Config {
            site: SiteConfig {
                home: Some("internal.local".into()),
                site_url: None,
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors[0].suggestion.as_deref(),
            Some("did you mean 'http://internal.local'?")
        );
    }

    #[test]
    fn unsupported_site_scheme_fails() {
        let config = Config {
            site: SiteConfig {
                home: None,
                site_url: Some("ftp://internal.local".into()),
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors[0].message.contains("unsupported scheme"));
    }

    #[test]
    fn duplicate_proxies_fail() {
        let config = Config {
            forwarding: ForwardingConfig {
                headers: HeaderNames::default(),
                trusted_proxies: vec!["10.0.0.1".parse().unwrap(), "10.0.0.1".parse().unwrap()],
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }
}
