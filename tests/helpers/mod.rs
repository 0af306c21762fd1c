pub mod mock_transport;

use sentrygram::config::TelegramConfig;
use sentrygram::core::{Event, Project};

pub const E2E_TEMPLATE: &str = "*[Sentry]* {project_name} {tag[level]}: {title}\n{message}\n{url}";

/// The sample event used across the dispatch tests.
pub fn sample_event() -> Event {
    Event {
        title: "Bar error".to_string(),
        message: "boom".to_string(),
        tags: vec![
            ("level".to_string(), "error".to_string()),
            ("environment".to_string(), "production".to_string()),
        ],
    }
}

pub fn sample_project() -> Project {
    Project {
        name: "Bar".to_string(),
        url: "http://x/1/".to_string(),
    }
}

/// A configured `TelegramConfig` sending to `receivers`.
pub fn telegram_config(receivers: &str) -> TelegramConfig {
    TelegramConfig {
        api_token: "api:token".to_string(),
        receivers: receivers.to_string(),
        message_template: E2E_TEMPLATE.to_string(),
        ..Default::default()
    }
}
