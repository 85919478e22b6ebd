//! Config path resolution for prefsync
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `PREFSYNC_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/prefsync` (if set)
//! 3. `~/.config/prefsync`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "PREFSYNC_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the prefsync config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand_path(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("prefsync");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("prefsync");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the default config file path
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(path).map_or_else(
        |_| shellexpand::tilde(path).into_owned(),
        std::borrow::Cow::into_owned,
    ))
}
