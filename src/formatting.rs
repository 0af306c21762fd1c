//! Builds the Telegram message text for an event.
//!
//! The Bot API rejects messages longer than [`MAX_MESSAGE_LENGTH`]
//! characters, so the event message is shortened when the rendered text
//! would not fit. Only the `{message}` value is ever cut; the title has its
//! own fixed cap and the remaining fields are used as-is.

use crate::core::{Event, MessagePayload, Project};
use crate::template::{Template, TemplateContext, TemplateError};
use std::collections::HashMap;
use tracing::debug;

/// Longest text accepted by `sendMessage`, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;
/// Titles are cut to this many characters before substitution.
pub const MAX_TITLE_LENGTH: usize = 500;
/// Appended to the event message when it had to be shortened.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

pub const DEFAULT_TEMPLATE: &str =
    "*[Sentry]* {project_name} {tag[level]}: *{title}*\n```{message}```\n{url}";

/// Every template value except the event message, resolved once per event.
#[derive(Debug, Clone)]
pub struct MessageFields<'a> {
    pub project_name: &'a str,
    pub url: &'a str,
    pub title: &'a str,
    pub tags: HashMap<&'a str, &'a str>,
}

impl<'a> MessageFields<'a> {
    pub fn new(project: &'a Project, event: &'a Event) -> Self {
        Self {
            project_name: &project.name,
            url: &project.url,
            title: truncate_chars(&event.title, MAX_TITLE_LENGTH),
            tags: event.tag_map(),
        }
    }

    fn context<'b>(&'b self, message: &'b str) -> TemplateContext<'b> {
        TemplateContext {
            project_name: self.project_name,
            url: self.url,
            title: self.title,
            message,
            tags: &self.tags,
        }
    }
}

/// Returns the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

/// Renders `template`, shortening `raw_message` once if the result is too long.
///
/// The shortened message is sized from the first render and the text is
/// rendered a second time without being measured again.
pub fn compile(template: &Template, fields: &MessageFields<'_>, raw_message: &str) -> String {
    let rendered = template.render(&fields.context(raw_message));
    let length = rendered.chars().count();
    if length <= MAX_MESSAGE_LENGTH {
        return rendered;
    }

    let excess = length - MAX_MESSAGE_LENGTH + TRUNCATION_MARKER.chars().count();
    // Clamped: the message may be shorter than what has to go.
    let keep = raw_message.chars().count().saturating_sub(excess);
    debug!(length, excess, keep, "Message too long, truncating event message");

    let shortened = format!("{}{}", truncate_chars(raw_message, keep), TRUNCATION_MARKER);
    template.render(&fields.context(&shortened))
}

/// Turns events into `sendMessage` payloads using one parsed template.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    template: Template,
}

impl MessageFormatter {
    pub fn new(template_source: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            template: Template::parse(template_source)?,
        })
    }

    /// The compiled message text for `event`.
    pub fn format_text(&self, project: &Project, event: &Event) -> String {
        let fields = MessageFields::new(project, event);
        compile(&self.template, &fields, &event.message)
    }

    /// The destination-independent payload for `event`.
    pub fn format(&self, project: &Project, event: &Event) -> MessagePayload {
        MessagePayload::new(self.format_text(project, event))
    }
}
