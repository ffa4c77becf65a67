use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the persisted translator settings including loading,
/// validating and saving them.
/// Default settings file, kept in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "translator_config.json";

/// Represents the persisted translator settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO 639-1)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO 639-1)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation engine to use
    #[serde(default)]
    pub api_engine: TranslationEngine,

    /// API key for the selected engine
    #[serde(default)]
    pub api_key: String,

    /// Tone written into the translation instruction
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Optional context prepended to the translation instruction
    #[serde(default)]
    pub context: String,

    /// Cumulative token count across sessions
    #[serde(default)]
    pub token_count: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationEngine {
    // @engine: OpenAI (live API)
    #[default]
    OpenAI,
    // @engine: Gemini 2.0 (simulated)
    Gemini,
    // @engine: DeepSeek V3 (simulated)
    DeepSeek,
}

impl TranslationEngine {
    // @returns: Engine name as shown in reports and used as ledger key
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Gemini => "Gemini 2.0",
            Self::DeepSeek => "DeepSeek V3",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Gemini => "gemini".to_string(),
            Self::DeepSeek => "deepseek".to_string(),
        }
    }
}

// Implement Display trait for TranslationEngine
impl std::fmt::Display for TranslationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationEngine
impl std::str::FromStr for TranslationEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "deepseek" => Ok(Self::DeepSeek),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "pt".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_tone() -> String {
    "neutral".to_string()
}

impl Config {
    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).context(format!(
            "Failed to read config file: {}",
            path.as_ref().display()
        ))?;
        let config =
            serde_json::from_str(&content).context("Failed to parse config file as JSON")?;
        Ok(config)
    }

    /// Load settings from a JSON file, writing the defaults to it first
    /// when the file does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::from_file(path);
        }

        warn!(
            "Config file not found at '{}', creating default config.",
            path.as_ref().display()
        );
        let config = Self::default();
        config
            .save_to(&path)
            .context("Failed to write default config file")?;
        Ok(config)
    }

    /// Save settings to a JSON file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(&path, json).context(format!(
            "Failed to write config to file: {}",
            path.as_ref().display()
        ))?;
        Ok(())
    }

    /// Restore every setting to its default value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        // The live engine cannot work without a key; the simulated engines
        // only apply a length check at call time
        if self.api_engine == TranslationEngine::OpenAI && self.api_key.trim().is_empty() {
            return Err(anyhow!("Translation API key is required for the OpenAI engine"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            api_engine: TranslationEngine::default(),
            api_key: String::new(),
            tone: default_tone(),
            context: String::new(),
            token_count: 0,
            log_level: LogLevel::default(),
        }
    }
}
