//! Configuration file discovery and parsing.
//!
//! The config lives in `$XDG_CONFIG_HOME/salatr/salatr.toml` (falling back
//! to the platform config dir). A `--config <dir>` override is stored
//! process-wide so every later lookup (the timetable path, the file watcher)
//! resolves against the same directory.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use super::Config;
use super::validation::validate_config;

/// Process-wide `--config` override.
static CUSTOM_CONFIG_DIR: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Set a custom configuration directory for this process.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    let resolved = match dir {
        Some(d) => {
            let path = PathBuf::from(&d);
            anyhow::ensure!(
                path.is_dir(),
                "config directory '{}' does not exist or is not a directory",
                d
            );
            Some(path)
        }
        None => None,
    };
    *CUSTOM_CONFIG_DIR.lock().unwrap() = resolved;
    Ok(())
}

/// The active custom config directory, if any.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CUSTOM_CONFIG_DIR.lock().unwrap().clone()
}

/// Directory holding `salatr.toml` (and, typically, the timetable CSV).
pub fn get_config_base_dir() -> Result<PathBuf> {
    if let Some(custom) = get_custom_config_dir() {
        return Ok(custom);
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join("salatr"));
    }
    dirs::config_dir()
        .map(|d| d.join("salatr"))
        .context("could not determine a configuration directory")
}

/// Full path of the configuration file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_base_dir()?.join("salatr.toml"))
}

/// Load the configuration, generating a default file on first run.
pub fn load() -> Result<Config> {
    let path = get_config_path()?;
    if !path.exists() {
        super::builder::create_default_config(&path)?;
    }
    load_from_path(&path)
}

/// Load and validate the configuration at `path`.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    validate_config(&config)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;

    Ok(config)
}
