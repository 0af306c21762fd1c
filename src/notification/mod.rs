//! Delivery of formatted notifications to Telegram.
//!
//! [`dispatcher::Dispatcher`] owns the fan-out and failure isolation and
//! depends only on the [`crate::core::Transport`] trait;
//! [`telegram::TelegramTransport`] is the HTTP implementation used in
//! production.
pub mod dispatcher;
pub mod telegram;

pub use dispatcher::{DeliveryOutcome, DispatchError, DispatchReport, Dispatcher, SkipReason};
pub use telegram::{DeliveryError, TelegramTransport};
