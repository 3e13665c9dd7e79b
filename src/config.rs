use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::content::Language;
use crate::engine::tooltip::TooltipSize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    #[serde(default = "default_tooltip_width")]
    pub tooltip_width: i32,
    #[serde(default = "default_tooltip_height")]
    pub tooltip_height: i32,
    #[serde(default = "default_tooltip_margin")]
    pub tooltip_margin: i32,
    #[serde(default)]
    pub skip_intro: bool,
}

fn default_tick_rate_ms() -> u64 {
    33
}
fn default_language() -> String {
    "es".to_string()
}
fn default_tooltip_width() -> i32 {
    46
}
fn default_tooltip_height() -> i32 {
    9
}
fn default_tooltip_margin() -> i32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            default_language: default_language(),
            shuffle_seed: None,
            tooltip_width: default_tooltip_width(),
            tooltip_height: default_tooltip_height(),
            tooltip_margin: default_tooltip_margin(),
            skip_intro: false,
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingodeck")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown languages.
    pub fn validate(&mut self) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 250);
        self.tooltip_width = self.tooltip_width.clamp(24, 80);
        self.tooltip_height = self.tooltip_height.clamp(5, 20);
        self.tooltip_margin = self.tooltip_margin.clamp(0, 4);
        if Language::from_code(&self.default_language).is_none() {
            warn!("unknown default_language {:?}, using es", self.default_language);
            self.default_language = default_language();
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn language(&self) -> Language {
        Language::from_code(&self.default_language).unwrap_or(Language::Spanish)
    }

    pub fn tooltip_size(&self) -> TooltipSize {
        TooltipSize {
            width: self.tooltip_width,
            height: self.tooltip_height,
            margin: self.tooltip_margin,
        }
    }
}
