use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{tlog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub endpoint: Option<String>,
}

impl Config {
    pub fn taskdeck_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".taskdeck"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::taskdeck_dir()?.join("taskdeck.toml"))
    }

    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("http://localhost:4000")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        tlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            tlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        tlog_debug!("Config loaded: endpoint={:?}", config.endpoint);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let deck_dir = Self::taskdeck_dir()?;
        tlog_debug!("Config::save taskdeck_dir={}", deck_dir.display());
        if !deck_dir.exists() {
            tlog_debug!("Creating taskdeck directory");
            fs::create_dir_all(&deck_dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        tlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn ensure_dirs() -> Result<()> {
        let deck_dir = Self::taskdeck_dir()?;
        if !deck_dir.exists() {
            tlog_debug!("Creating taskdeck directory: {}", deck_dir.display());
            fs::create_dir_all(&deck_dir)?;
        }
        Ok(())
    }
}
