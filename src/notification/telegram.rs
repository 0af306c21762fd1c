//! A client for posting messages to the Telegram Bot API.

use crate::core::{OutboundRequest, Transport, TransportResponse};
use async_trait::async_trait;
use reqwest::{header, redirect, Client, Proxy};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Per-request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid proxy URL '{proxy}': {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    /// The wrapped error never carries the request URL, which holds the bot token.
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeliveryError::Request(e) if e.is_timeout())
    }

    fn request(error: reqwest::Error) -> Self {
        DeliveryError::Request(error.without_url())
    }
}

/// Sends JSON requests with redirects disabled and TLS verification on.
///
/// Clients for proxied requests are built on first use of each proxy URL
/// and kept for later calls.
pub struct TelegramTransport {
    direct: Client,
    proxied: Mutex<HashMap<String, Client>>,
}

impl TelegramTransport {
    pub fn new() -> Result<Self, DeliveryError> {
        Ok(Self {
            direct: Self::client_builder()
                .no_proxy()
                .build()
                .map_err(DeliveryError::request)?,
            proxied: Mutex::new(HashMap::new()),
        })
    }

    fn client_builder() -> reqwest::ClientBuilder {
        Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(concat!("sentrygram/", env!("CARGO_PKG_VERSION")))
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<Client, DeliveryError> {
        let Some(proxy_url) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut proxied = self
            .proxied
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(client) = proxied.get(proxy_url) {
            return Ok(client.clone());
        }

        let to_proxy_error = |source: reqwest::Error| DeliveryError::Proxy {
            proxy: proxy_url.to_string(),
            source: source.without_url(),
        };
        let client = Self::client_builder()
            .proxy(Proxy::all(proxy_url).map_err(to_proxy_error)?)
            .build()
            .map_err(to_proxy_error)?;
        proxied.insert(proxy_url.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    #[instrument(skip_all, fields(proxied = request.proxy.is_some()))]
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, DeliveryError> {
        let client = self.client_for(request.proxy.as_deref())?;

        let response = client
            .post(&request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(request.timeout)
            .json(&request.body)
            .send()
            .await
            .map_err(DeliveryError::request)?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status, error = %e.without_url(), "Failed to read Telegram API response body");
                String::new()
            }
        };
        debug!(status, body = %body, "Telegram API responded");

        Ok(TransportResponse { status, body })
    }
}
