//! Fans one event out to every configured Telegram destination.
//!
//! Each destination is attempted independently: a failed delivery is logged
//! and recorded in the [`DispatchReport`] but never stops the remaining
//! sends and never reaches the caller as an error. Only a broken message
//! template aborts a dispatch, before anything is sent.

use crate::config::TelegramConfig;
use crate::core::{Destination, Event, OutboundRequest, Project, Transport};
use crate::destinations;
use crate::formatting::MessageFormatter;
use crate::notification::telegram::DeliveryError;
use crate::template::TemplateError;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid message template: {0}")]
    Template(#[from] TemplateError),
}

/// Why a dispatch sent nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Bot token or receivers are not set.
    NotConfigured,
    /// The receivers setting holds no usable line.
    NoDestinations,
}

/// The result of one delivery attempt.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub destination: Destination,
    pub result: Result<(), DeliveryError>,
}

/// What happened during a dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub skipped: Option<SkipReason>,
    pub deliveries: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            deliveries: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.deliveries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.deliveries.iter().filter(|d| d.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

/// Delivers notifications through a [`Transport`].
///
/// The dispatcher holds no configuration; callers pass the current settings
/// on every call.
pub struct Dispatcher<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> Dispatcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Formats `event` and sends it to every receiver in `config`.
    #[instrument(skip_all, fields(project = %project.name))]
    pub async fn dispatch(
        &self,
        config: &TelegramConfig,
        project: &Project,
        event: &Event,
    ) -> Result<DispatchReport, DispatchError> {
        debug!(title = %event.title, "Received event");

        if !config.is_configured() {
            debug!("Telegram notifications are not configured, skipping");
            return Ok(DispatchReport::skipped(SkipReason::NotConfigured));
        }

        let destinations = destinations::parse(&config.receivers);
        if destinations.is_empty() {
            debug!("No receivers configured, skipping");
            return Ok(DispatchReport::skipped(SkipReason::NoDestinations));
        }
        debug!(count = destinations.len(), "Parsed receivers");

        let payload = MessageFormatter::new(&config.message_template)?.format(project, event);
        debug!(?payload, "Built payload");

        let url = config.send_message_url();
        let proxy = config.proxy().map(str::to_string);
        debug!(api_origin = %config.api_origin, proxied = proxy.is_some(), "Built url");

        let sends = destinations.into_iter().map(|destination| {
            let request = OutboundRequest {
                url: url.clone(),
                body: payload.for_destination(&destination),
                proxy: proxy.clone(),
                timeout: config.timeout(),
            };
            async move {
                let result = self.deliver(&request).await;
                match &result {
                    Ok(()) => debug!(destination = %destination, "Message delivered"),
                    Err(e) => warn!(
                        destination = %destination,
                        error = %e,
                        "Failed to deliver Telegram notification"
                    ),
                }
                DeliveryOutcome {
                    destination,
                    result,
                }
            }
        });
        let report = DispatchReport {
            skipped: None,
            deliveries: join_all(sends).await,
        };

        info!(
            attempted = report.attempted(),
            failed = report.failed(),
            "Dispatched notification"
        );
        Ok(report)
    }

    async fn deliver(&self, request: &OutboundRequest) -> Result<(), DeliveryError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(DeliveryError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }
}
