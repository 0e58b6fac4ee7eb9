//! Configuration management for panedeck.
//!
//! Loads configuration from ${PANEDECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::settings::{ModuleSettings, PositionSettings, Settings};

/// Dashboard-wide options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Directory for the log file. Defaults to `${PANEDECK_HOME}/logs`.
    pub log_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "panedeck".to_string(),
            log_dir: None,
        }
    }
}

/// One `[[widgets]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default)]
    pub focus_char: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub position: PositionSettings,
    /// Widget-specific keys, interpreted by the widget's module.
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub options: toml::Table,
}

impl WidgetConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            module: ModuleSettings {
                kind: self.kind.clone(),
                name: self.name.clone(),
            },
            title: self.title.clone(),
            refresh_interval: self.refresh_interval,
            focus_char: self.focus_char.clone().filter(|c| !c.is_empty()),
            enabled: self.enabled,
            position: self.position,
        }
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(toml::Value::as_str)
    }

    pub fn option_strings(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(toml::Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(toml::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_enabled() -> bool {
    true
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub widgets: Vec<WidgetConfig>,
}

pub mod paths {
    //! Path resolution for panedeck configuration and data directories.
    //!
    //! PANEDECK_HOME resolution order:
    //! 1. PANEDECK_HOME environment variable (if set)
    //! 2. ~/.config/panedeck (default)
    //! 3. ./.panedeck when no home directory can be determined

    use std::path::PathBuf;

    pub fn panedeck_home() -> PathBuf {
        if let Ok(home) = std::env::var("PANEDECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".panedeck"),
            |h| h.join(".config").join("panedeck"),
        )
    }

    pub fn config_path() -> PathBuf {
        panedeck_home().join("config.toml")
    }

    pub fn log_dir() -> PathBuf {
        panedeck_home().join("logs")
    }
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Rejects duplicate widget names and multi-character focus keys.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for widget in &self.widgets {
            if !seen.insert(widget.name.as_str()) {
                anyhow::bail!("Duplicate widget name '{}'", widget.name);
            }
            if let Some(ch) = &widget.focus_char
                && ch.chars().count() > 1
            {
                anyhow::bail!(
                    "Widget '{}' focus_char must be a single character, got '{ch}'",
                    widget.name
                );
            }
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dashboard.log_dir.clone().unwrap_or_else(paths::log_dir)
    }

    pub fn enabled_widgets(&self) -> impl Iterator<Item = &WidgetConfig> {
        self.widgets.iter().filter(|w| w.enabled)
    }
}
