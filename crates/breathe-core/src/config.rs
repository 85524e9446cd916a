//! Configuration management for breathe

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Preset used when no pattern is given on the command line
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Explicit pattern ("4-7-8"), overrides `default_preset` when set
    #[serde(default)]
    pub pattern: Option<String>,

    /// Ring the terminal bell after each completed cycle
    #[serde(default = "default_bell")]
    pub bell: bool,

    /// Width of the breathing bar in columns
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    /// Milliseconds between ticks
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

fn default_preset() -> String {
    "box".to_string()
}

fn default_bell() -> bool {
    true
}

fn default_bar_width() -> usize {
    30
}

/// Widest breathing bar drawn, in columns
pub const MAX_BAR_WIDTH: usize = 200;

fn default_cadence_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            pattern: None,
            bell: default_bell(),
            bar_width: default_bar_width(),
            cadence_ms: default_cadence_ms(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Bar width in columns, capped at `MAX_BAR_WIDTH`
    pub fn bar_width(&self) -> usize {
        self.bar_width.min(MAX_BAR_WIDTH)
    }

    /// Tick cadence, never shorter than one millisecond
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms.max(1))
    }
}
