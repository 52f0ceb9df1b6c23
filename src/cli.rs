//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (serve, rewrite, validate, init), and their associated
//! argument structs. Server flags have environment variable equivalents
//! for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::Variant;
use crate::hooks::Hook;

#[derive(Parser)]
#[command(
    name = "portly",
    version,
    about = "Rewrites application URLs for the origin seen through a reverse proxy",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        portly init                          Create a starter config\n  \
        portly serve                         Start with ./portly.yaml or defaults\n  \
        portly rewrite http://app.local/x --forwarded-host shop.example.com"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the rewrite service
    Serve(Box<ServeArgs>),

    /// Rewrite URLs offline, as if the given headers had been received
    Rewrite(RewriteArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Generate a starter config file
    Init(InitArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        portly serve                                 Auto-detect config\n  \
        portly serve -c portly.yaml -p 8080 --pretty Local dev mode\n  \
        portly serve --variant host                  Host swapping only")]
pub struct ServeArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Override the configured variant
    #[arg(long, env = "PORTLY_VARIANT")]
    pub variant: Option<VariantArg>,

    /// The early bootstrap script is installed (router variant)
    #[arg(long, env = "PORTLY_EARLY_BOOTSTRAP")]
    pub early_bootstrap: bool,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 262_144,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        portly rewrite http://app.local/wp-content/a.css --forwarded-host shop.example.com\n  \
        portly rewrite http://app.local/app/x --forwarded-host shop.example.com --forwarded-path /app\n  \
        portly rewrite '\"http://app.local\"' --hook home_option --forwarded-host shop.example.com")]
pub struct RewriteArgs {
    /// URLs, stored option values, or upload_dir JSON objects to rewrite
    #[arg(required = true)]
    pub values: Vec<String>,

    /// External host the proxy forwards for
    #[arg(long)]
    pub forwarded_host: Option<String>,

    /// External path prefix the proxy adds
    #[arg(long)]
    pub forwarded_path: Option<String>,

    /// Value of the use-SSL signal (anything but "off" means TLS upstream)
    #[arg(long)]
    pub use_ssl: Option<String>,

    /// Hook the values are filtered through
    #[arg(long, default_value = "content_url")]
    pub hook: Hook,

    /// Engine variant
    #[arg(long, default_value = "router")]
    pub variant: VariantArg,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "portly.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        portly init                          Quick start config (yaml)\n  \
        portly init -f toml -o portly.toml   TOML format\n  \
        portly init --full                   Every option, documented")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include full documentation as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VariantArg {
    Host,
    Router,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Host => Self::Host,
            VariantArg::Router => Self::Router,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rewrite_parses_hook_and_variant() {
        let cli = Cli::try_parse_from([
            "portly",
            "rewrite",
            "http://app.local/x",
            "--forwarded-host",
            "shop.example.com",
            "--hook",
            "redirect",
            "--variant",
            "host",
        ])
        .unwrap();
        let Some(Commands::Rewrite(args)) = cli.command else {
            panic!("expected rewrite command");
        };
        assert_eq!(args.hook, Hook::Redirect);
        assert_eq!(Variant::from(args.variant), Variant::Host);
        assert_eq!(args.values, vec!["http://app.local/x".to_string()]);
    }
}
