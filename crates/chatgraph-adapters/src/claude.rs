//! Claude conversation export adapter.
//!
//! A Claude data export contains `conversations.json`: an array of
//! conversation objects with ISO 8601 `created_at` and `updated_at`
//! strings. One date is taken per conversation.

use chatgraph_core::{FormatError, ParsedChat};
use chrono::TimeZone;
use serde_json::Value;

use crate::{date_value, first_truthy, Adapter, ExportFormat};

/// Source label for Claude exports.
pub const SOURCE: &str = "Claude";

const DATE_FIELDS: &[&str] = &["created_at", "updated_at"];

/// Adapter for Claude conversation arrays.
pub struct ClaudeAdapter;

impl Adapter for ClaudeAdapter {
    const FORMAT: ExportFormat = ExportFormat::Claude;

    fn parse<Tz: TimeZone>(
        value: &Value,
        file_name: &str,
        _tz: &Tz,
    ) -> Result<ParsedChat, FormatError> {
        let conversations = value
            .as_array()
            .ok_or(FormatError::ExpectedConversations)?;

        let dates = conversations
            .iter()
            .filter_map(|c| first_truthy(c, DATE_FIELDS))
            .filter_map(date_value)
            .collect();

        Ok(ParsedChat::new(file_name, dates).with_source(SOURCE))
    }
}
