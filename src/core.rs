//! Core domain types and service traits for Sentrygram
//!
//! This module defines the data handed to us by the monitoring host, the
//! parsed delivery targets, and the transport contract the dispatcher
//! depends on.

use crate::notification::telegram::DeliveryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// An application error event reported by the monitoring platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Event {
    /// Short, human-readable summary of the error.
    pub title: String,
    /// Full exception text.
    #[serde(default)]
    pub message: String,
    /// Key/value annotations in the order the host reported them.
    /// Keys may repeat.
    #[serde(default)]
    pub tags: Vec<(String, String)>,
}

impl Event {
    /// Indexes the tags by key. When a key repeats, the last value wins.
    pub fn tag_map(&self) -> HashMap<&str, &str> {
        self.tags
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }
}

/// The project (and issue link) an event belongs to. Owned by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Project {
    /// Display name of the project.
    pub name: String,
    /// Absolute URL of the issue page for the event's group.
    pub url: String,
}

/// A single host notification: the project context plus the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Notification {
    pub project: Project,
    pub event: Event,
}

/// One chat (and optionally one forum topic inside it) to deliver to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub chat_id: String,
    pub thread_id: Option<String>,
}

impl Destination {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            thread_id: None,
        }
    }

    pub fn with_thread(chat_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            thread_id: Some(thread_id.into()),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.thread_id {
            Some(thread_id) => write!(f, "{}/{}", self.chat_id, thread_id),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

/// The `sendMessage` body shared by every destination of one notification.
///
/// The routing fields are only filled in on a per-destination copy, see
/// [`MessagePayload::for_destination`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePayload {
    pub text: String,
    pub parse_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<String>,
}

impl MessagePayload {
    pub const PARSE_MODE: &'static str = "Markdown";

    pub fn new(text: String) -> Self {
        Self {
            text,
            parse_mode: Self::PARSE_MODE.to_string(),
            chat_id: None,
            message_thread_id: None,
        }
    }

    /// Returns a copy of the payload addressed to `destination`.
    pub fn for_destination(&self, destination: &Destination) -> Self {
        Self {
            chat_id: Some(destination.chat_id.clone()),
            message_thread_id: destination.thread_id.clone(),
            ..self.clone()
        }
    }
}

/// A fully described outbound call handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    /// Serialized as the JSON request body.
    pub body: MessagePayload,
    /// Proxy to route this request through, if any.
    pub proxy: Option<String>,
    pub timeout: Duration,
}

/// Status and body returned by the messaging API.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Anything above 299 counts as a failed delivery, whatever the body says.
    pub fn is_success(&self) -> bool {
        self.status <= 299
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Performs a single JSON POST to the messaging API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response.
    ///
    /// # Returns
    /// * `Ok(TransportResponse)` for any HTTP response, successful or not
    /// * `Err` if no response could be obtained (connect, proxy, timeout)
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, DeliveryError>;
}
