//! Configuration management for EmbedTUI
//!
//! Handles config file loading/saving and API key lookup.
//! Config is stored at ~/.config/embedtui/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::tmdb::TMDB_BASE_URL;
use crate::app::PanelSettings;
use crate::embed::sources::DEFAULT_EMBED_HOST;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB API read token
    pub tmdb_api_key: Option<String>,
    /// TMDB API root
    pub tmdb_base_url: String,
    /// Host of the per-episode embed service
    pub embed_host: String,
    /// Seconds before a loading embed is reported as timed out
    pub load_timeout_secs: u64,
    /// Probe embed URLs over HTTP to detect load completion
    pub probe_embeds: bool,
    /// Open each loaded embed in the system browser
    pub open_on_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: TMDB_BASE_URL.to_string(),
            embed_host: DEFAULT_EMBED_HOST.to_string(),
            load_timeout_secs: 30,
            probe_embeds: true,
            open_on_load: false,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/embedtui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("embedtui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Explicit file if given, otherwise the default location
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::load()),
        }
    }

    /// TMDB API key, with the TMDB_API_KEY environment variable taking priority
    pub fn tmdb_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        self.tmdb_api_key.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No TMDB API key. Set TMDB_API_KEY or tmdb_api_key in {}",
                Self::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".into())
            )
        })
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs.max(1))
    }

    /// Settings handed to the panel
    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings {
            load_timeout: self.load_timeout(),
            embed_host: self.embed_host.clone(),
            open_on_load: self.open_on_load,
        }
    }
}
