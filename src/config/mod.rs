pub mod types;

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{ArmConfig, Config, OutputConfig, ScanConfig};

const CONFIG_FILE_NAME: &str = ".azqr.toml";

/// Get the global config file path (~/.azqr.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.azqr.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `.azqr.toml` in the current
/// directory wins over the one in the home directory, and defaults apply
/// when neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let cwd = std::env::current_dir().ok();
    load_config_from(cwd.as_deref(), global_config_path().as_deref())
}

/// Load from a local directory and a global file, local first.
pub fn load_config_from(local_dir: Option<&Path>, global: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(dir) = local_dir {
        let local = local_config_path(dir);
        if local.is_file() {
            log::debug!("Loading configuration from {}", local.display());
            return read_config(&local);
        }
    }

    if let Some(global) = global
        && global.is_file()
    {
        log::debug!("Loading configuration from {}", global.display());
        return read_config(global);
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse a TOML document. Missing sections and keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))
}
