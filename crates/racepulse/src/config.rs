//! Configuration management for racepulse.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gateway::Season;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "racepulse";

/// Default settings database file name.
const DATABASE_FILE_NAME: &str = "settings.db";

/// Default system prompt sent with every completion request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a motorsport expert assistant in April 2025. \
Provide accurate and up-to-date information about racing series, championships, drivers, teams, \
and motorsport history, with a focus on the current 2025 season. When asked about standings, \
results, or current information, always provide information for the 2025 season unless \
specifically asked about historical data. Focus on Formula 1, MotoGP, IndyCar, WEC, Formula E, \
NASCAR, WRC, and DTM.";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RACEPULSE_`, `__` between sections)
/// 2. TOML config file at `~/.config/racepulse/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Results API configuration.
    pub results: ResultsConfig,
    /// Text-completion API configuration.
    pub completion: CompletionConfig,
    /// Live timing configuration.
    pub timing: TimingConfig,
    /// Settings storage configuration.
    pub storage: StorageConfig,
}

/// Results API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Base address every endpoint path is appended to.
    pub base_url: String,
    /// Suffix selecting the response format.
    pub format_suffix: String,
    /// Season tried first before falling back to `current`.
    pub preferred_season: String,
}

/// Text-completion API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat completions endpoint.
    pub endpoint: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// System prompt prepended to the user's message.
    pub system_prompt: String,
}

/// Live timing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Age after which the latest result is refetched.
    pub staleness_secs: u64,
    /// Delay between redraws in watch mode.
    pub watch_interval_secs: u64,
}

/// Settings storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the settings database.
    /// Defaults to `~/.local/share/racepulse/settings.db`
    pub database_path: Option<PathBuf>,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            format_suffix: ".json".to_string(),
            preferred_season: "2025".to_string(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.5,
            max_tokens: 1024,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            staleness_secs: 30,
            watch_interval_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RACEPULSE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base = self.results.base_url.trim();
        if base.is_empty() {
            return Err(Error::ConfigValidation {
                message: "results.base_url must not be empty".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("results.base_url must be an http(s) URL: {base}"),
            });
        }

        if self.results.preferred_season.parse::<Season>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "results.preferred_season must be 'current' or a four-digit year: {}",
                    self.results.preferred_season
                ),
            });
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "completion.temperature ({}) must be between 0 and 2",
                    self.completion.temperature
                ),
            });
        }

        if self.completion.max_tokens == 0 {
            return Err(Error::ConfigValidation {
                message: "completion.max_tokens must be greater than 0".to_string(),
            });
        }

        if self.timing.watch_interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timing.watch_interval_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the preferred season.
    ///
    /// Falls back to the `current` alias if the configured value does not
    /// parse; [`Config::validate`] rejects that case on load.
    #[must_use]
    pub fn preferred_season(&self) -> Season {
        self.results
            .preferred_season
            .parse()
            .unwrap_or(Season::Current)
    }

    /// Get the settings database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the staleness window as a Duration.
    #[must_use]
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.timing.staleness_secs)
    }

    /// Get the watch redraw interval as a Duration.
    #[must_use]
    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.timing.watch_interval_secs)
    }
}
