use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::debug;

use crate::app::SlotConfig;
use crate::theme::ThemeConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/events";

/// Contents of `<config_dir>/event-calendar/config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collection endpoint of the events API.
    pub api_url: String,
    /// Local hour at which a new event starts when created with `n`.
    pub slot_start_hour: u32,
    /// Length of a new event in minutes.
    pub slot_minutes: u32,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            slot_start_hour: 9,
            slot_minutes: 60,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Read the config file, or defaults if there is none.
    pub fn load() -> Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).wrap_err_with(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn slot(&self) -> SlotConfig {
        SlotConfig {
            start_hour: self.slot_start_hour.min(23),
            minutes: self.slot_minutes.max(1),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("event-calendar").join("config.toml"))
}
