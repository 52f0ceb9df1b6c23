//! `portly serve`: start the rewrite service.
//!
//! Loads configuration from file (or defaults), applies CLI overrides,
//! validates the result, and starts the Axum HTTP server with graceful
//! shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::config;
use crate::config::validation::validate;
use crate::error::PortlyError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: ServeArgs) -> Result<(), PortlyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let loaded = config::resolve(args.config.as_deref()).await?;
    let mut config = loaded.config;

    // CLI overrides win over the file
    if let Some(variant) = args.variant {
        config.variant = variant.into();
    }
    if args.early_bootstrap {
        config.early_bootstrap = true;
    }

    if let Err(errors) = validate(&config) {
        return Err(PortlyError::ConfigValidation { errors });
    }

    if config.forwarding.trusted_proxies.is_empty() {
        tracing::warn!("no trusted proxies configured, forwarding headers are accepted from any peer");
    }

    let variant = config.variant;
    let bootstrap = config.bootstrap_active();
    let state = Arc::new(AppState::new(config, loaded.source_name));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        variant = %variant,
        early_bootstrap = bootstrap,
        "portly started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("portly stopped");
    Ok(())
}
