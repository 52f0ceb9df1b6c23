//! Configuration loading and validation.
//!
//! [`resolve`] finds the config file (explicit path or auto-detected in
//! the working directory) and loads it, falling back to built-in defaults
//! when no file exists. Submodules provide the data model, validation
//! logic, and concrete file sources.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::PortlyError;
use model::Config;

/// Candidate file names probed in the working directory.
pub const CANDIDATES: &[&str] = &["portly.yaml", "portly.yml", "portly.json", "portly.toml"];

/// A loaded config and where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source_name: String,
}

/// Load the config from `explicit`, an auto-detected file, or defaults.
///
/// An explicit path that does not exist is an error; a missing
/// auto-detected file is not, since every setting has a default.
pub async fn resolve(explicit: Option<&Path>) -> Result<LoadedConfig, PortlyError> {
    if let Some(path) = explicit {
        return load_file(path).await;
    }

    for name in CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return load_file(&path).await;
        }
    }

    tracing::info!("no config file found, using defaults");
    Ok(LoadedConfig {
        config: Config::default(),
        source_name: "defaults".into(),
    })
}

async fn load_file(path: &Path) -> Result<LoadedConfig, PortlyError> {
    let source = sources::for_path(path)?;
    let config = source.load().await?;
    Ok(LoadedConfig {
        config,
        source_name: format!("{} ({})", source.path().display(), source.name()),
    })
}
