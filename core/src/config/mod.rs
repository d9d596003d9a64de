//! Configuration management
//!
//! A single TOML file with an `[endpoint]` table for the model service and an
//! `[agent]` table for the session. Every field has a default, so a missing
//! file or a partial one is fine.

pub mod store;

pub use store::{AgentConfig, Config, EndpointConfig};

use std::path::PathBuf;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "slate.toml";

/// Find the configuration file in standard locations
///
/// The working directory wins over the user config directory.
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    use dirs::config_dir;
    use home::home_dir;

    if let Some(dir) = config_dir() {
        return Some(dir.join("slate"));
    }

    if let Some(home) = home_dir() {
        return Some(home.join(".config").join("slate"));
    }

    None
}

/// Path `slate config init` writes to
pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
