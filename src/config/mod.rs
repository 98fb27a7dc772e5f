use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::contact::RelayConfig;
use crate::ui::theme::ThemeName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeName,
    /// Root of the per-project asset folders (media, screenshots, README).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Portfolio content; the built-in sample is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub contact: RelayConfig,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_assets_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("folio").join("assets"))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            assets_dir: default_assets_dir(),
            catalog: None,
            contact: RelayConfig::default(),
            log_file: None,
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not find config directory")?
        .join("folio");

    Ok(config_dir.join("config.yml"))
}

/// Reads the config at `path`, writing the defaults there first if the file
/// does not exist yet.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = Config::default();
        let yaml =
            serde_yaml::to_string(&default_config).context("Failed to serialize default config")?;

        fs::write(path, yaml).context("Failed to write default config file")?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(path).context("Failed to read config file")?;

    let config: Config =
        serde_yaml::from_str(&config_content).context("Failed to parse config file")?;

    Ok(config)
}

pub fn load_or_create_config() -> Result<Config> {
    let config_path = get_config_path()?;
    load_from(&config_path)
        .with_context(|| format!("Config file: {}", config_path.display()))
}
