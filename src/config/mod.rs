mod init;
mod schema;

pub use init::write_default_config;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/fracture-screen/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("fracture-screen"))
}

/// Get the default config file path (~/.config/fracture-screen/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to the built-in model when that file doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("Config file not found at {}", explicit.display());
            }
            read_config(&explicit)
        }
        None => {
            let default_path = match get_config_path() {
                Ok(p) => p,
                Err(e) => {
                    log::debug!("No default config location: {}", e);
                    return Ok(Config::default());
                }
            };
            if default_path.exists() {
                read_config(&default_path)
            } else {
                log::debug!(
                    "No config at {}, using built-in model",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    log::debug!("Loading config from {}", path.display());

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}
