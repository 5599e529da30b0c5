//! OpenAI conversation export adapter.
//!
//! `conversations.json` from a ChatGPT data export is an array of
//! conversation objects. Each carries `create_time` and `update_time` as
//! fractional Unix seconds; one date is taken per conversation.

use chatgraph_core::{DateValue, FormatError, ParsedChat};
use chrono::TimeZone;
use serde_json::Value;

use crate::{first_truthy, Adapter, ExportFormat};

/// Source label for OpenAI exports.
pub const SOURCE: &str = "OpenAI";

const DATE_FIELDS: &[&str] = &["create_time", "update_time"];

/// Adapter for OpenAI conversation arrays.
pub struct OpenAiAdapter;

impl Adapter for OpenAiAdapter {
    const FORMAT: ExportFormat = ExportFormat::OpenAi;

    fn parse<Tz: TimeZone>(
        value: &Value,
        file_name: &str,
        _tz: &Tz,
    ) -> Result<ParsedChat, FormatError> {
        let conversations = value
            .as_array()
            .ok_or(FormatError::ExpectedConversations)?;

        // Only numeric timestamps count; seconds become epoch milliseconds
        let dates = conversations
            .iter()
            .filter_map(|c| first_truthy(c, DATE_FIELDS))
            .filter_map(Value::as_f64)
            .map(|seconds| DateValue::EpochMillis(seconds * 1000.0))
            .collect();

        Ok(ParsedChat::new(file_name, dates).with_source(SOURCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_conversations() {
        let value = json!([
            {"title": "a", "create_time": 1700000000.5, "update_time": 1700000100.0},
            {"title": "b", "create_time": null, "update_time": 1700003600},
            {"title": "c", "create_time": "2024-01-01", "update_time": null},
            {"title": "d"}
        ]);

        let parsed = OpenAiAdapter::parse(&value, "conversations.json", &Utc).unwrap();
        assert_eq!(parsed.name, "conversations.json");
        assert_eq!(parsed.source.as_deref(), Some("OpenAI"));
        assert_eq!(
            parsed.dates,
            vec![
                DateValue::EpochMillis(1_700_000_000_500.0),
                DateValue::EpochMillis(1_700_003_600_000.0),
            ]
        );
        assert!(!parsed.is_group);
        assert!(parsed.topics.is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        let err = OpenAiAdapter::parse(&json!({"messages": []}), "x.json", &Utc).unwrap_err();
        assert_eq!(err, FormatError::ExpectedConversations);
    }
}
