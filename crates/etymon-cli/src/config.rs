//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML configuration file and resolves the
//! location of the usage counter store.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use etymon::{EtymonError, config::AppConfig};

const STORE_FILE_NAME: &str = "usage.json";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for EtymonError {
    fn from(err: ConfigError) -> Self {
        EtymonError::Io(io::Error::other(err.to_string()))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "etymon", "etymon")
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (etymon/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, EtymonError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("etymon/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = project_dirs() {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Resolves where usage counters are kept.
///
/// An explicit path wins; otherwise the file lives in the platform data
/// directory. Returns `None` when no location can be determined, in which
/// case counters are kept in memory for this run only.
pub fn store_path(explicit_path: Option<impl AsRef<Path>>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.as_ref().to_path_buf());
    }

    let path = project_dirs().map(|dirs| dirs.data_dir().join(STORE_FILE_NAME));
    if path.is_none() {
        debug!("Could not determine platform-specific data directory");
    }
    path
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, EtymonError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}
