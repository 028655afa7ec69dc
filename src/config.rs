//! Configuration module for Rollcall.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, RollcallError};

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Invocation token users type to address the bot (e.g. "@rollcall").
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Character limit of an outgoing broadcast.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

fn default_bot_name() -> String {
    "@rollcall".to_string()
}

fn default_max_message_length() -> usize {
    4000 // Google Chat message limit
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            max_message_length: default_max_message_length(),
        }
    }
}

/// Webhook server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Group snapshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Whether groups are persisted across restarts.
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,
    /// Path to the JSON snapshot file.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_enabled() -> bool {
    true
}

fn default_storage_path() -> String {
    "data/groups.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            path: default_storage_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/rollcall.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Bot configuration.
    #[serde(default)]
    pub bot: BotConfig,
    /// Webhook server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RollcallError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RollcallError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ROLLCALL_BOT_NAME`: Override the bot invocation token
    /// - `ROLLCALL_STORAGE_PATH`: Override the snapshot file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("ROLLCALL_BOT_NAME") {
            if !name.is_empty() {
                self.bot.name = name;
            }
        }
        if let Ok(path) = std::env::var("ROLLCALL_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The bot name is empty or contains whitespace
    /// - The message length limit is zero
    /// - Storage is enabled without a path
    pub fn validate(&self) -> Result<()> {
        if self.bot.name.is_empty() || self.bot.name.chars().any(char::is_whitespace) {
            return Err(RollcallError::Validation(
                "bot.name must be a single non-empty token".to_string(),
            ));
        }
        if self.bot.max_message_length == 0 {
            return Err(RollcallError::Validation(
                "bot.max_message_length must be greater than zero".to_string(),
            ));
        }
        if self.storage.enabled && self.storage.path.is_empty() {
            return Err(RollcallError::Validation(
                "storage is enabled but storage.path is not set".to_string(),
            ));
        }
        Ok(())
    }
}
