use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading, validating and saving the settings of an
/// editing session.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the caption set being edited (ISO code)
    #[serde(default = "default_language")]
    pub language: String,

    /// Editor settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Limits and thresholds applied by the editing surface
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EditorConfig {
    /// Maximum title length in characters
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,

    /// Maximum description length in characters
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,

    /// Shortest caption accepted, in milliseconds
    #[serde(default = "default_min_caption_duration_ms")]
    pub min_caption_duration_ms: u64,

    /// Number of work events after which a save is due
    #[serde(default = "default_save_after_events")]
    pub save_after_events: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_title_chars: default_max_title_chars(),
            max_description_chars: default_max_description_chars(),
            min_caption_duration_ms: default_min_caption_duration_ms(),
            save_after_events: default_save_after_events(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_max_title_chars() -> usize {
    2048
}

fn default_max_description_chars() -> usize {
    4096
}

fn default_min_caption_duration_ms() -> u64 {
    100
}

fn default_save_after_events() -> usize {
    10
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _language_name = crate::language_utils::get_language_name(&self.language)?;

        if self.editor.max_title_chars == 0 {
            return Err(anyhow!("max_title_chars must be greater than zero"));
        }

        if self.editor.save_after_events == 0 {
            return Err(anyhow!("save_after_events must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            editor: EditorConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
