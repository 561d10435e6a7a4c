pub mod schema;

pub use schema::MeteoConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default home directory (~/.meteo-tools).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".meteo-tools"))
        .unwrap_or_else(|| PathBuf::from(".meteo-tools"))
}

/// Default config file location inside the home directory.
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("config.toml")
}

/// Expand a leading `~` in a user-supplied path.
pub fn resolve_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<MeteoConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: MeteoConfig =
            toml::from_str(&contents).context("Failed to parse config (TOML)")?;
        Ok(config)
    } else {
        Ok(MeteoConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &MeteoConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}
