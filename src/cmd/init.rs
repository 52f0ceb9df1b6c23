//! `portly init`: generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::PortlyError;

pub fn execute(args: &InitArgs) -> Result<(), PortlyError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("portly.{}", args.format.extension())));

    if output.exists() {
        return Err(PortlyError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# Portly config

variant: router
"#;

const YAML_FULL: &str = r#"# Portly config
#
# All values shown are defaults. Uncomment and modify as needed.

# host: swap the host of generated URLs
# router: also strip the forwarded path prefix and filter redirects
variant: router

# Set when the early bootstrap script is installed (router only).
# Derives cookie paths and strips the forwarded prefix from request paths.
# early_bootstrap: false

# forwarding:
#   headers:
#     forwarded_host: x-forwarded-host
#     forwarded_path: x-forwarded-path
#     use_ssl: usessl           # any value but "off" means TLS at the proxy
#   # Peers allowed to send the headers above. Empty accepts any peer.
#   trusted_proxies: ["10.0.0.1"]

# Canonical values stored by the application
# site:
#   home: "http://internal.local"
#   site_url: "http://internal.local"
"#;

const JSON_MINIMAL: &str = r#"{
  "variant": "router"
}
"#;

const JSON_FULL: &str = r#"{
  "variant": "router",
  "early_bootstrap": false,
  "forwarding": {
    "headers": {
      "forwarded_host": "x-forwarded-host",
      "forwarded_path": "x-forwarded-path",
      "use_ssl": "usessl"
    },
    "trusted_proxies": []
  },
  "site": {
    "home": "http://internal.local",
    "site_url": "http://internal.local"
  }
}
"#;

const TOML_MINIMAL: &str = r#"# Portly config

variant = "router"
"#;

const TOML_FULL: &str = r#"# Portly config
#
# All values shown are defaults. Uncomment and modify as needed.

variant = "router"
# early_bootstrap = false

[forwarding]
# trusted_proxies = ["10.0.0.1"]

[forwarding.headers]
# forwarded_host = "x-forwarded-host"
# forwarded_path = "x-forwarded-path"
# use_ssl = "usessl"

# [site]
# home = "http://internal.local"
# site_url = "http://internal.local"
"#;
