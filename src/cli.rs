//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. The global flags are merged on top of the `sentrygram.toml`
//! file and environment variables when the configuration is loaded.

use clap::{Args, Parser, Subcommand};
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Forwards monitoring events to Telegram chats.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Base URL of the Bot API.
    #[arg(long, value_name = "URL", global = true)]
    pub api_origin: Option<String>,

    /// HTTP or SOCKS proxy for outbound requests.
    #[arg(long, value_name = "URL", global = true)]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum Command {
    /// Send a notification to every configured receiver.
    Send(EventArgs),
    /// Print the compiled message text without sending it.
    Preview(EventArgs),
    /// Print the parsed receivers, one per line.
    #[default]
    Receivers,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EventArgs {
    /// JSON notification document; read from stdin when omitted or `-`.
    #[arg(short, long, value_name = "FILE")]
    pub event: Option<PathBuf>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut telegram = Dict::new();
        if let Some(origin) = &self.api_origin {
            telegram.insert("api_origin".into(), Value::from(origin.clone()));
        }
        if let Some(proxy) = &self.proxy {
            telegram.insert("proxy".into(), Value::from(proxy.clone()));
        }
        if !telegram.is_empty() {
            dict.insert("telegram".into(), Value::Dict(Tag::Default, telegram));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
