//! Sentrygram - Telegram notifications for error monitoring
//!
//! Reads a notification document, renders it with the configured template
//! and delivers it to every configured Telegram chat.

use anyhow::{Context, Result};
use clap::Parser;
use sentrygram::{
    cli::{Cli, Command, EventArgs},
    config::Config,
    core::Notification,
    destinations,
    formatting::MessageFormatter,
    notification::{Dispatcher, SkipReason, TelegramTransport},
};
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        init_logging("error");
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    init_logging(&config.log_level);

    match &cli.command {
        Command::Receivers => {
            for destination in destinations::parse(&config.telegram.receivers) {
                println!("{}", destination);
            }
        }
        Command::Preview(args) => {
            let notification = read_notification(args)?;
            let formatter = MessageFormatter::new(&config.telegram.message_template)
                .context("invalid message template")?;
            println!(
                "{}",
                formatter.format_text(&notification.project, &notification.event)
            );
        }
        Command::Send(args) => {
            let notification = read_notification(args)?;
            let transport = Arc::new(TelegramTransport::new()?);
            let dispatcher = Dispatcher::new(transport);

            let report = dispatcher
                .dispatch(&config.telegram, &notification.project, &notification.event)
                .await?;

            match report.skipped {
                Some(SkipReason::NotConfigured) => {
                    warn!("api_token and receivers must both be set; nothing sent")
                }
                Some(SkipReason::NoDestinations) => warn!("No usable receivers; nothing sent"),
                None => info!(
                    "Delivered to {} of {} receivers",
                    report.succeeded(),
                    report.attempted()
                ),
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so `preview` and `receivers` output stays clean.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_notification(args: &EventArgs) -> Result<Notification> {
    let raw = match args.event.as_deref() {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("invalid notification document")
}
