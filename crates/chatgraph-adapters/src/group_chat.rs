//! Group and DM chat export adapter.
//!
//! A chat export is an object with an optional `name`, an optional `type`
//! (e.g. `personal_chat`, `private_supergroup`) and a `messages` array.
//! Each message may carry:
//! - `id`, `type` (`message` or `service`), `date`
//! - `from` / `actor` / `from_id` for the sender
//! - `text` as a string or a list of plain strings and `{type, text}` entities
//! - `reply_to_message_id`
//! - `action: "topic_created"` with a `title` on forum service records
//! - embedded topic metadata (`topic_id`, `message_thread_id`, `thread_id`,
//!   `topic`, `topic_title`)

use chatgraph_core::{DateValue, FormatError, ParsedChat};
use chrono::TimeZone;
use serde::Deserialize;
use serde_json::Value;

use crate::members::MemberStats;
use crate::topics::reconstruct_topics;
use crate::{date_value, Adapter, ExportFormat};

/// Adapter for chat exports with a `messages` array.
pub struct GroupChatAdapter;

impl Adapter for GroupChatAdapter {
    const FORMAT: ExportFormat = ExportFormat::GroupChat;

    fn parse<Tz: TimeZone>(
        value: &Value,
        file_name: &str,
        tz: &Tz,
    ) -> Result<ParsedChat, FormatError> {
        let raw_messages = value
            .get("messages")
            .and_then(Value::as_array)
            .ok_or(FormatError::MissingMessages)?;

        let messages: Vec<RawMessage> = raw_messages.iter().map(RawMessage::from_value).collect();

        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or(file_name)
            .to_string();

        let chat_type = value.get("type").and_then(Value::as_str).unwrap_or("");
        let is_group =
            chat_type.contains("group") || messages.iter().any(RawMessage::is_topic_created);

        let dates: Vec<DateValue> = messages.iter().filter_map(RawMessage::date).collect();
        let topics = if is_group {
            reconstruct_topics(&messages, tz)
        } else {
            Vec::new()
        };
        let members = MemberStats::from_messages(&messages);

        Ok(ParsedChat {
            name,
            dates,
            source: None,
            is_group,
            topics,
            member_word_counts: members.word_counts,
            member_message_counts: members.message_counts,
        })
    }
}

// ============================================================================
// Raw message format
// ============================================================================

/// One entry of the `messages` array. Every field is optional and kept as
/// raw JSON so odd exports degrade to missing data instead of errors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawMessage {
    id: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
    date: Option<Value>,
    action: Option<Value>,
    title: Option<Value>,
    reply_to_message_id: Option<Value>,
    from: Option<Value>,
    actor: Option<Value>,
    from_id: Option<Value>,
    text: Option<Value>,
    topic_id: Option<Value>,
    message_thread_id: Option<Value>,
    thread_id: Option<Value>,
    topic: Option<Value>,
    topic_title: Option<Value>,
}

/// An id-like value (non-empty string or number) as a string key.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: &Option<Value>) -> Option<&str> {
    value.as_ref()?.as_str().filter(|s| !s.is_empty())
}

impl RawMessage {
    /// Read a message leniently; non-object entries become empty messages.
    pub(crate) fn from_value(value: &Value) -> Self {
        RawMessage::deserialize(value).unwrap_or_default()
    }

    pub(crate) fn id(&self) -> Option<String> {
        self.id.as_ref().and_then(id_string)
    }

    /// Whether this is a user message. Entries without a type count as
    /// messages; service records do not.
    pub(crate) fn is_message(&self) -> bool {
        match &self.kind {
            None => true,
            Some(kind) => kind.as_str() == Some("message"),
        }
    }

    pub(crate) fn is_topic_created(&self) -> bool {
        non_empty_str(&self.action) == Some("topic_created")
    }

    /// Title of a topic-creation record.
    pub(crate) fn title(&self) -> Option<&str> {
        non_empty_str(&self.title)
    }

    pub(crate) fn date(&self) -> Option<DateValue> {
        self.date.as_ref().and_then(date_value)
    }

    pub(crate) fn reply_to(&self) -> Option<String> {
        self.reply_to_message_id.as_ref().and_then(id_string)
    }

    /// Sender identity: display name, then actor, then raw sender id.
    pub(crate) fn member(&self) -> Option<String> {
        non_empty_str(&self.from)
            .or_else(|| non_empty_str(&self.actor))
            .map(str::to_string)
            .or_else(|| self.from_id.as_ref().and_then(id_string))
    }

    /// Message text with rich-text fragments joined by single spaces.
    pub(crate) fn text(&self) -> Option<String> {
        let text = match self.text.as_ref()? {
            Value::String(s) => s.clone(),
            Value::Array(fragments) => fragments
                .iter()
                .filter_map(|fragment| match fragment {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(_) => fragment.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            _ => return None,
        };
        Some(text).filter(|t| !t.trim().is_empty())
    }

    /// Topic metadata embedded in the message itself: `(id, name)`.
    ///
    /// Fields are checked in order `topic_id`, `message_thread_id`,
    /// `thread_id`, `topic`. A `topic` object may carry `id` plus `title`
    /// or `name`; a scalar `topic` is an id.
    pub(crate) fn embedded_topic(&self) -> Option<(String, Option<String>)> {
        let topic_object_name = self.topic.as_ref().and_then(|t| {
            t.get("title")
                .or_else(|| t.get("name"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        });
        let name = non_empty_str(&self.topic_title)
            .or(topic_object_name)
            .map(str::to_string);

        let id = [&self.topic_id, &self.message_thread_id, &self.thread_id]
            .into_iter()
            .find_map(|field| field.as_ref().and_then(id_string))
            .or_else(|| match self.topic.as_ref()? {
                Value::Object(_) => self.topic.as_ref()?.get("id").and_then(id_string),
                scalar => id_string(scalar),
            })?;

        Some((id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn message(value: Value) -> RawMessage {
        RawMessage::from_value(&value)
    }

    #[test]
    fn test_missing_messages_rejected() {
        let err = GroupChatAdapter::parse(&json!({"name": "x"}), "f.json", &Utc).unwrap_err();
        assert_eq!(err, FormatError::MissingMessages);

        let err =
            GroupChatAdapter::parse(&json!({"messages": "nope"}), "f.json", &Utc).unwrap_err();
        assert_eq!(err, FormatError::MissingMessages);
    }

    #[test]
    fn test_name_falls_back_to_file_name() {
        let parsed = GroupChatAdapter::parse(
            &json!({"name": "", "messages": [{"date": "2024-01-01T00:00:00"}]}),
            "result.json",
            &Utc,
        )
        .unwrap();
        assert_eq!(parsed.name, "result.json");

        let parsed = GroupChatAdapter::parse(
            &json!({"name": "Family", "messages": []}),
            "result.json",
            &Utc,
        )
        .unwrap();
        assert_eq!(parsed.name, "Family");
        assert!(parsed.dates.is_empty());
    }

    #[test]
    fn test_dates_include_service_records_and_skip_missing() {
        let parsed = GroupChatAdapter::parse(
            &json!({"messages": [
                {"type": "service", "date": "2024-01-01T00:00:00"},
                {"type": "message", "date": "2024-01-02T00:00:00"},
                {"type": "message", "date": ""},
                {"type": "message"},
                "not an object"
            ]}),
            "f.json",
            &Utc,
        )
        .unwrap();
        assert_eq!(parsed.dates.len(), 2);
        assert!(!parsed.is_group);
    }

    #[test]
    fn test_group_detection() {
        let parsed = GroupChatAdapter::parse(
            &json!({"type": "private_supergroup", "messages": []}),
            "f.json",
            &Utc,
        )
        .unwrap();
        assert!(parsed.is_group);

        let parsed = GroupChatAdapter::parse(
            &json!({"type": "personal_chat", "messages": [
                {"id": 1, "type": "service", "action": "topic_created", "title": "News"}
            ]}),
            "f.json",
            &Utc,
        )
        .unwrap();
        assert!(parsed.is_group);
        assert_eq!(parsed.topics.len(), 1);
    }

    #[test]
    fn test_member_priority() {
        assert_eq!(
            message(json!({"from": "Alice", "actor": "Bot", "from_id": "user1"})).member(),
            Some("Alice".to_string())
        );
        assert_eq!(
            message(json!({"from": null, "actor": "Bot", "from_id": "user1"})).member(),
            Some("Bot".to_string())
        );
        assert_eq!(
            message(json!({"from": "", "from_id": 12345})).member(),
            Some("12345".to_string())
        );
        assert_eq!(message(json!({"from_id": ""})).member(), None);
    }

    #[test]
    fn test_text_extraction() {
        assert_eq!(
            message(json!({"text": "plain"})).text(),
            Some("plain".to_string())
        );
        assert_eq!(
            message(json!({"text": [
                "Check",
                {"type": "link", "text": "https://example.com"},
                {"type": "custom_emoji"},
                "now"
            ]}))
            .text(),
            Some("Check https://example.com now".to_string())
        );
        assert_eq!(message(json!({"text": ""})).text(), None);
        assert_eq!(message(json!({"text": []})).text(), None);
        assert_eq!(message(json!({})).text(), None);
    }

    #[test]
    fn test_embedded_topic_priority() {
        assert_eq!(
            message(json!({"topic_id": 5, "message_thread_id": 6})).embedded_topic(),
            Some(("5".to_string(), None))
        );
        assert_eq!(
            message(json!({"thread_id": "7", "topic_title": "Memes"})).embedded_topic(),
            Some(("7".to_string(), Some("Memes".to_string())))
        );
        assert_eq!(
            message(json!({"topic": {"id": 8, "name": "Jobs"}})).embedded_topic(),
            Some(("8".to_string(), Some("Jobs".to_string())))
        );
        assert_eq!(
            message(json!({"topic": 9})).embedded_topic(),
            Some(("9".to_string(), None))
        );
        assert_eq!(message(json!({"text": "hi"})).embedded_topic(), None);
    }

    #[test]
    fn test_is_message() {
        assert!(message(json!({"type": "message"})).is_message());
        assert!(message(json!({})).is_message());
        assert!(!message(json!({"type": "service"})).is_message());
    }
}
