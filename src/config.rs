//! Configuration management for Sentrygram
//!
//! This module defines the main `Config` struct and the per-project Telegram
//! settings. It uses the `figment` crate to layer defaults, a
//! `sentrygram.toml` file, `SENTRYGRAM_` environment variables and
//! command-line overrides.

use crate::cli::Cli;
use crate::formatting::DEFAULT_TEMPLATE;
use crate::notification::telegram::DEFAULT_TIMEOUT;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "sentrygram.toml";
pub const DEFAULT_API_ORIGIN: &str = "https://api.telegram.org";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Telegram delivery settings.
    pub telegram: TelegramConfig,
}

/// Settings for delivering notifications through the Bot API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TelegramConfig {
    /// Base URL of the Bot API.
    pub api_origin: String,
    /// Bot token, e.g. `123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11`.
    pub api_token: String,
    /// Chat ids, one per line, optionally `CHAT_ID/THREAD_ID`.
    pub receivers: String,
    /// Template for the message text.
    pub message_template: String,
    /// HTTP or SOCKS proxy for all requests.
    pub proxy: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl TelegramConfig {
    /// Whether both a bot token and a receivers list are set.
    pub fn is_configured(&self) -> bool {
        !self.api_token.trim().is_empty() && !self.receivers.trim().is_empty()
    }

    /// The `sendMessage` endpoint for the configured bot.
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_origin.trim_end_matches('/'),
            self.api_token.trim()
        )
    }

    /// The proxy URL, treating a blank setting as unset.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy
            .as_deref()
            .map(str::trim)
            .filter(|proxy| !proxy.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            api_token: String::new(),
            receivers: String::new(),
            message_template: DEFAULT_TEMPLATE.to_string(),
            proxy: None,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads the configuration, layering defaults, the TOML file,
    /// environment variables and command-line overrides.
    ///
    /// # Arguments
    /// * `cli` - Parsed command-line arguments; `--config` selects the file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = cli
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            // e.g. SENTRYGRAM_TELEGRAM__API_TOKEN=123:abc
            .merge(Env::prefixed("SENTRYGRAM_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            telegram: TelegramConfig::default(),
        }
    }
}
