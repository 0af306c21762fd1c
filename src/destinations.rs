//! Parsing of the multi-line `receivers` setting.
//!
//! One destination per line, either `CHAT_ID` or `CHAT_ID/THREAD_ID`.

use crate::core::Destination;

/// Parses `receivers` into destinations, preserving line order.
///
/// Lines are trimmed and blank lines are skipped. Each line is split on its
/// first `/`; whatever follows becomes the thread id. A line with an empty
/// chat id (e.g. `/42`) is skipped. Never fails.
pub fn parse(receivers: &str) -> Vec<Destination> {
    receivers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<Destination> {
    let (chat_id, thread_id) = match line.split_once('/') {
        Some((chat_id, thread_id)) => (chat_id.trim(), Some(thread_id.trim())),
        None => (line, None),
    };
    if chat_id.is_empty() {
        return None;
    }
    Some(Destination {
        chat_id: chat_id.to_string(),
        thread_id: thread_id
            .filter(|thread_id| !thread_id.is_empty())
            .map(str::to_string),
    })
}
