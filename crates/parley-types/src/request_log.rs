//! Request log entries.
//!
//! Every successful LLM call is recorded with its raw request and response
//! payloads in a store separate from the turn history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::RawExchange;
use crate::record::Record;

/// Number of leading words of the triggering message kept in a title.
const TITLE_WORDS: usize = 5;

/// A durable record of one LLM call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: u64,
    pub title: String,
    pub content: RawExchange,
    pub timestamp: DateTime<Utc>,
}

impl RequestLogEntry {
    /// Build a short title from the first words of `message`, suffixed with
    /// `...` when words were dropped.
    pub fn derive_title(message: &str) -> String {
        let mut words = message.split_whitespace();
        let head: Vec<&str> = words.by_ref().take(TITLE_WORDS).collect();
        let mut title = head.join(" ");
        if words.next().is_some() {
            title.push_str("...");
        }
        title
    }
}

/// Fields of a request log entry before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequestLog {
    pub title: String,
    pub content: RawExchange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewRequestLog {
    /// Entry for an exchange triggered by `trigger` (the user's message).
    pub fn from_exchange(trigger: &str, exchange: RawExchange) -> Self {
        Self {
            title: RequestLogEntry::derive_title(trigger),
            content: exchange,
            timestamp: None,
        }
    }
}

impl Record for RequestLogEntry {
    type Draft = NewRequestLog;

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: NewRequestLog, now: DateTime<Utc>) -> Self {
        RequestLogEntry {
            id,
            title: draft.title,
            content: draft.content,
            timestamp: draft.timestamp.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derive_title_short_message_untouched() {
        assert_eq!(RequestLogEntry::derive_title("hello there"), "hello there");
    }

    #[test]
    fn test_derive_title_exactly_five_words_no_ellipsis() {
        assert_eq!(
            RequestLogEntry::derive_title("one two three four five"),
            "one two three four five"
        );
    }

    #[test]
    fn test_derive_title_truncates_with_ellipsis() {
        assert_eq!(
            RequestLogEntry::derive_title("what is the capital of  France today"),
            "what is the capital of..."
        );
    }

    #[test]
    fn test_derive_title_collapses_whitespace() {
        assert_eq!(RequestLogEntry::derive_title("  a\n\tb  "), "a b");
    }

    #[test]
    fn test_entry_content_shape() {
        let entry = RequestLogEntry::from_draft(
            1,
            NewRequestLog::from_exchange(
                "hi",
                RawExchange {
                    request: json!({"model": "m"}),
                    response: json!({"choices": []}),
                },
            ),
            Utc::now(),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["title"], "hi");
        assert_eq!(value["content"]["request"]["model"], "m");
        assert!(value["content"]["response"]["choices"].is_array());
    }
}
