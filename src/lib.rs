//! Sentrygram - forwards error-monitoring events to Telegram chats.
//!
//! This library renders a notification from an event and a message
//! template, then delivers it to every configured chat through the
//! Telegram Bot API.
pub mod cli;
pub mod config;
pub mod core;
pub mod destinations;
pub mod formatting;
pub mod notification;
pub mod template;

// Re-export core types for convenience
pub use crate::core::*;
