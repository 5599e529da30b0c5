//! # chatgraph-adapters
//!
//! Parsers that turn raw export JSON into [`chatgraph_core::ParsedChat`].
//!
//! Supported formats:
//! - Group/DM chat exports (an object with a `messages` array)
//! - OpenAI conversation exports (an array with numeric `create_time`)
//! - Claude conversation exports (an array with string `created_at`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatgraph_adapters::{load_path, InputKind};
//! use chatgraph_core::{Session, ViewConfig};
//!
//! let mut session = Session::new(ViewConfig::chats());
//! let parsed = load_path("result.json", InputKind::Auto, &chrono::Local)?;
//! session.load(parsed)?;
//! # Ok::<(), chatgraph_core::ChatError>(())
//! ```

pub mod claude;
pub mod group_chat;
mod members;
pub mod openai;
mod topics;

use chatgraph_core::{ChatResult, DateValue, FormatError, ParsedChat};
use chrono::TimeZone;
use serde_json::Value;
use std::path::Path;

/// The export formats this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GroupChat,
    OpenAi,
    Claude,
}

impl ExportFormat {
    /// Get the string identifier for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GroupChat => "group-chat",
            ExportFormat::OpenAi => "openai",
            ExportFormat::Claude => "claude",
        }
    }
}

/// Which top-level shapes a caller is willing to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Any supported format
    #[default]
    Auto,
    /// Only chat exports with a `messages` array
    Messages,
    /// Only conversation arrays
    Conversations,
}

/// Trait for export adapters.
pub trait Adapter {
    /// The format this adapter parses.
    const FORMAT: ExportFormat;

    /// Convert export JSON into a normalized chat. Hour-of-day statistics
    /// are computed in `tz`.
    fn parse<Tz: TimeZone>(
        value: &Value,
        file_name: &str,
        tz: &Tz,
    ) -> Result<ParsedChat, FormatError>;
}

/// Decide which adapter handles a JSON document.
///
/// Conversation arrays are classified by their first element.
pub fn detect_format(value: &Value, kind: InputKind) -> Result<ExportFormat, FormatError> {
    match (value, kind) {
        (Value::Object(_), InputKind::Auto | InputKind::Messages) => Ok(ExportFormat::GroupChat),
        (_, InputKind::Messages) => Err(FormatError::MissingMessages),
        (Value::Array(items), InputKind::Auto | InputKind::Conversations) => {
            let first = items.first();
            let field = |name: &str| first.and_then(|f| f.get(name));
            if field("create_time").is_some_and(Value::is_number)
                || field("update_time").is_some_and(Value::is_number)
            {
                Ok(ExportFormat::OpenAi)
            } else if field("created_at").is_some_and(Value::is_string)
                || field("updated_at").is_some_and(Value::is_string)
            {
                Ok(ExportFormat::Claude)
            } else {
                Err(FormatError::UnrecognizedConversations)
            }
        }
        (_, InputKind::Conversations) => Err(FormatError::ExpectedConversations),
        _ => Err(FormatError::UnrecognizedShape),
    }
}

/// Detect the format of `value` and parse it.
pub fn parse_value<Tz: TimeZone>(
    value: &Value,
    file_name: &str,
    kind: InputKind,
    tz: &Tz,
) -> ChatResult<ParsedChat> {
    match detect_format(value, kind)? {
        ExportFormat::GroupChat => {
            parse_with::<group_chat::GroupChatAdapter, _>(value, file_name, tz)
        }
        ExportFormat::OpenAi => parse_with::<openai::OpenAiAdapter, _>(value, file_name, tz),
        ExportFormat::Claude => parse_with::<claude::ClaudeAdapter, _>(value, file_name, tz),
    }
}

/// Run one adapter and log what it produced.
fn parse_with<A: Adapter, Tz: TimeZone>(
    value: &Value,
    file_name: &str,
    tz: &Tz,
) -> ChatResult<ParsedChat> {
    let parsed = A::parse(value, file_name, tz)?;

    tracing::debug!(
        file = file_name,
        format = A::FORMAT.as_str(),
        dates = parsed.dates.len(),
        topics = parsed.topics.len(),
        members = parsed.member_message_counts.len(),
        "parsed export"
    );
    Ok(parsed)
}

/// Parse export JSON text.
pub fn parse_str<Tz: TimeZone>(
    text: &str,
    file_name: &str,
    kind: InputKind,
    tz: &Tz,
) -> ChatResult<ParsedChat> {
    let value: Value = serde_json::from_str(text)?;
    parse_value(&value, file_name, kind, tz)
}

/// Read and parse an export file. The file name becomes the default chat name.
pub fn load_path<P: AsRef<Path>, Tz: TimeZone>(
    path: P,
    kind: InputKind,
    tz: &Tz,
) -> ChatResult<ParsedChat> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    parse_str(&text, &file_name, kind, tz)
}

/// JavaScript-style truthiness, used where exports fall back between fields.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Return the first truthy value among `fields` of an object.
pub(crate) fn first_truthy<'a>(object: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    let mut last = None;
    for field in fields {
        last = object.get(*field);
        if last.is_some_and(is_truthy) {
            return last;
        }
    }
    last
}

/// A raw date field as a [`DateValue`]: non-empty text or a non-zero number
/// of epoch milliseconds.
pub(crate) fn date_value(value: &Value) -> Option<DateValue> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(DateValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(DateValue::EpochMillis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_detect_group_chat() {
        let value = json!({"messages": []});
        assert_eq!(
            detect_format(&value, InputKind::Auto),
            Ok(ExportFormat::GroupChat)
        );
        assert_eq!(
            detect_format(&value, InputKind::Conversations),
            Err(FormatError::ExpectedConversations)
        );
    }

    #[test]
    fn test_detect_conversations() {
        let openai = json!([{"create_time": 1700000000.5}]);
        assert_eq!(detect_format(&openai, InputKind::Auto), Ok(ExportFormat::OpenAi));

        let openai = json!([{"create_time": null, "update_time": 1700000000}]);
        assert_eq!(detect_format(&openai, InputKind::Auto), Ok(ExportFormat::OpenAi));

        let claude = json!([{"created_at": "2024-03-01T10:00:00Z"}]);
        assert_eq!(
            detect_format(&claude, InputKind::Conversations),
            Ok(ExportFormat::Claude)
        );
        assert_eq!(
            detect_format(&claude, InputKind::Messages),
            Err(FormatError::MissingMessages)
        );

        assert_eq!(
            detect_format(&json!([{"title": "x"}]), InputKind::Auto),
            Err(FormatError::UnrecognizedConversations)
        );
        assert_eq!(
            detect_format(&json!([]), InputKind::Auto),
            Err(FormatError::UnrecognizedConversations)
        );
    }

    #[test]
    fn test_detect_rejects_scalars() {
        assert_eq!(
            detect_format(&json!("hello"), InputKind::Auto),
            Err(FormatError::UnrecognizedShape)
        );
        assert_eq!(
            detect_format(&json!(42), InputKind::Conversations),
            Err(FormatError::ExpectedConversations)
        );
    }

    #[test]
    fn test_first_truthy_falls_back() {
        let value = json!({"a": 0, "b": "x"});
        assert_eq!(first_truthy(&value, &["a", "b"]), Some(&json!("x")));
        let value = json!({"a": 0});
        assert_eq!(first_truthy(&value, &["a", "b"]), None);
        let value = json!({"a": "", "b": 0});
        assert_eq!(first_truthy(&value, &["a", "b"]), Some(&json!(0)));
    }

    #[test]
    fn test_date_value() {
        assert_eq!(
            date_value(&json!("2024-01-01")),
            Some(DateValue::Text("2024-01-01".to_string()))
        );
        assert_eq!(
            date_value(&json!(1700000000000u64)),
            Some(DateValue::EpochMillis(1_700_000_000_000.0))
        );
        assert_eq!(date_value(&json!("")), None);
        assert_eq!(date_value(&json!(0)), None);
        assert_eq!(date_value(&json!(true)), None);
        assert_eq!(date_value(&json!(null)), None);
    }

    #[test]
    fn test_adapters_match_detected_format() {
        assert_eq!(group_chat::GroupChatAdapter::FORMAT, ExportFormat::GroupChat);
        assert_eq!(openai::OpenAiAdapter::FORMAT, ExportFormat::OpenAi);
        assert_eq!(claude::ClaudeAdapter::FORMAT, ExportFormat::Claude);

        let value = json!([{"created_at": "2024-03-01T10:00:00Z"}]);
        let parsed = parse_value(&value, "claude.json", InputKind::Auto, &Utc).unwrap();
        assert_eq!(parsed.source.as_deref(), Some(claude::SOURCE));
    }

    #[test]
    fn test_parse_str_reports_bad_json() {
        let err = parse_str("{not json", "broken.json", InputKind::Auto, &Utc).unwrap_err();
        assert!(matches!(err, chatgraph_core::ChatError::Json { .. }));
    }

    #[test]
    fn test_parse_str_scenario() {
        let text = r#"{"messages":[{"date":"2024-01-05T10:00:00Z","type":"message","from":"A","text":"hi"}]}"#;
        let parsed = parse_str(text, "export.json", InputKind::Auto, &Utc).unwrap();
        assert_eq!(parsed.name, "export.json");
        assert_eq!(parsed.dates.len(), 1);
        let series = chatgraph_core::bucket_dates(
            &parsed.dates,
            chatgraph_core::TimePeriod::Month,
            &Utc,
        );
        assert_eq!(series.labels, vec!["Jan 2024"]);
        assert_eq!(series.values, vec![1]);
    }
}
