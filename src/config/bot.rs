//! Bot configuration loading from config.toml
//!
//! The options here describe the bot itself (name, version, logging channel,
//! registration mode). Secrets such as the bot token never live in this file;
//! they are read from the environment at startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "SLASHKIT_CONFIG";

const DEFAULT_GREEN: u32 = 0x0057_F287;
const DEFAULT_RED: u32 = 0x00ED_4245;

const fn enabled() -> bool {
    true
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used in status messages and the stats overview
    pub name: String,
    /// Version string shown in presence and status messages
    pub version: String,
    /// Channel receiving "online" and error notices
    pub logging_channel_id: u64,
    /// Register commands in the development guild only
    #[serde(default)]
    pub experimental: bool,
    /// Development guild used when `experimental` is set
    #[serde(default)]
    pub dev_server_id: u64,
    /// User allowed to run owner-only commands
    pub owner_id: u64,
    /// Publish commands to the platform on first ready
    #[serde(default = "enabled")]
    pub auto_send_commands: bool,
    /// Include the built-in `Stats` command
    #[serde(default = "enabled")]
    pub stats_command: bool,
    /// Include the built-in `UpdateCommands` command
    #[serde(default)]
    pub update_commands_command: bool,
    /// Colour of positive status embeds
    pub green: Option<u32>,
    /// Colour of error embeds
    pub red: Option<u32>,
    /// Colour of informational embeds
    pub default_color: Option<u32>,
}

impl BotConfig {
    /// Colour for positive status embeds.
    #[must_use]
    pub fn green(&self) -> u32 {
        self.green.unwrap_or(DEFAULT_GREEN)
    }

    /// Colour for error embeds.
    #[must_use]
    pub fn red(&self) -> u32 {
        self.red.unwrap_or(DEFAULT_RED)
    }

    /// Colour for informational embeds.
    #[must_use]
    pub fn default_color(&self) -> u32 {
        self.default_color.unwrap_or(0)
    }

    /// Checks option combinations serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config {
                message: "Bot name cannot be empty".to_string(),
            });
        }
        if self.experimental && self.dev_server_id == 0 {
            return Err(Error::Config {
                message: "experimental mode needs dev_server_id".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses and validates a config document.
pub fn parse_config(contents: &str) -> Result<BotConfig> {
    let config: BotConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads bot configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or inconsistent
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BotConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads bot configuration from `SLASHKIT_CONFIG`, or ./config.toml when unset
pub fn load_default_config() -> Result<BotConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
