//! A recording transport for testing dispatcher fan-out.

use async_trait::async_trait;
use sentrygram::core::{OutboundRequest, Transport, TransportResponse};
use sentrygram::notification::DeliveryError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    pub sent_requests: Arc<Mutex<Vec<OutboundRequest>>>,
    failing_chats: HashSet<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `chat_id` fail without a response.
    pub fn failing_for(mut self, chat_id: &str) -> Self {
        self.failing_chats.insert(chat_id.to_string());
        self
    }

    pub fn get_sent_requests(&self) -> Vec<OutboundRequest> {
        self.sent_requests.lock().unwrap().clone()
    }

    pub fn attempted_chats(&self) -> Vec<String> {
        self.get_sent_requests()
            .into_iter()
            .filter_map(|request| request.body.chat_id)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, DeliveryError> {
        self.sent_requests.lock().unwrap().push(request.clone());

        let chat_id = request.body.chat_id.as_deref().unwrap_or_default();
        if self.failing_chats.contains(chat_id) {
            return Err(DeliveryError::Status {
                status: 502,
                body: "simulated transport failure".to_string(),
            });
        }
        Ok(TransportResponse {
            status: 200,
            body: r#"{"ok":true}"#.to_string(),
        })
    }
}
