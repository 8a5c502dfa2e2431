//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CASTDIR_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "castdir.db";

const DEFAULT_TVMAZE_BASE_URL: &str = "https://api.tvmaze.com";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Service configuration loaded from TOML
///
/// Every field is optional in the file; missing values fall back to defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Folder holding the database file
    pub root_folder: Option<PathBuf>,
    /// Base URL of the upstream people directory
    pub tvmaze_base_url: String,
    /// Timeout applied to every upstream request
    pub upstream_timeout_secs: u64,
    /// Base URL used for hypermedia links when a request carries no Host header
    pub public_base_url: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            tvmaze_base_url: DEFAULT_TVMAZE_BASE_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            public_base_url: None,
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from an explicit path or the platform config file
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and
    /// defaults are returned.
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let path = match explicit_path {
            Some(p) => p.to_path_buf(),
            None => match default_config_file() {
                Ok(p) => p,
                Err(e) => {
                    info!("No config file found ({}), using defaults", e);
                    return Self::default();
                }
            },
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Invalid config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &ServiceConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Ensure the root folder exists and return the database path inside it
pub fn prepare_database_path(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join(DATABASE_FILE))
}

/// Get default configuration file path for the platform
fn default_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("castdir").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/castdir/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("castdir"))
        .unwrap_or_else(|| PathBuf::from("./castdir_data"))
}
