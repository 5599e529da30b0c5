//! Normalized chat records.
//!
//! Every supported export format is converted into a [`ParsedChat`]. A
//! session then assigns it a [`ChatId`] and stores it as a [`ChatRecord`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Number of slots in an hour-of-day histogram.
pub const HOURS_PER_DAY: usize = 24;

/// Message counts per local hour of day, index 0 is midnight.
pub type HourHistogram = [u64; HOURS_PER_DAY];

/// Word → occurrence count.
pub type WordCounts = BTreeMap<String, u64>;

/// Opaque identifier assigned to a record when it enters a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Generate a new time-ordered id.
    pub fn generate() -> Self {
        ChatId(Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw date-like value as it appears in an export.
///
/// Parsing is deferred to bucketing time, where unparseable values are
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// Timestamp text, e.g. `2024-01-05T10:00:00`
    Text(String),
    /// Milliseconds since the Unix epoch
    EpochMillis(f64),
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}

impl From<f64> for DateValue {
    fn from(value: f64) -> Self {
        DateValue::EpochMillis(value)
    }
}

/// A forum topic reconstructed from a group export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic id (the id of its creation record, or an embedded topic id)
    pub id: String,
    /// Display name
    pub name: String,
    /// Messages per member
    pub member_counts: BTreeMap<String, u64>,
    /// Messages per local hour of day
    pub hour_counts: HourHistogram,
    /// Messages per member per local hour of day
    pub member_hour_counts: BTreeMap<String, HourHistogram>,
}

impl Topic {
    /// Create an empty topic.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            member_counts: BTreeMap::new(),
            hour_counts: [0; HOURS_PER_DAY],
            member_hour_counts: BTreeMap::new(),
        }
    }

    /// Placeholder name used until a real title is known.
    pub fn default_name(id: &str) -> String {
        format!("Topic {}", id)
    }

    /// Whether the topic still carries its placeholder name.
    pub fn has_default_name(&self) -> bool {
        self.name == Self::default_name(&self.id)
    }

    /// Whether any member message was attributed to this topic.
    pub fn has_data(&self) -> bool {
        !self.member_counts.is_empty()
    }

    /// Total member messages in this topic.
    pub fn total_messages(&self) -> u64 {
        self.member_counts.values().sum()
    }
}

/// The normalized output of a format adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedChat {
    /// Chat or file name
    pub name: String,
    /// Raw dates of every dated item
    pub dates: Vec<DateValue>,
    /// Provenance label used when aggregating by source
    pub source: Option<String>,
    /// Whether the export is a group chat
    pub is_group: bool,
    /// Reconstructed forum topics (group exports only)
    pub topics: Vec<Topic>,
    /// Word frequencies per member
    pub member_word_counts: BTreeMap<String, WordCounts>,
    /// Text messages per member
    pub member_message_counts: BTreeMap<String, u64>,
}

impl ParsedChat {
    /// Create a record with only a name and dates.
    pub fn new(name: impl Into<String>, dates: Vec<DateValue>) -> Self {
        Self {
            name: name.into(),
            dates,
            ..Self::default()
        }
    }

    /// Set the provenance label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A record stored in a session. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRecord {
    pub id: ChatId,
    pub name: String,
    pub dates: Vec<DateValue>,
    pub source: Option<String>,
    pub is_group: bool,
    pub topics: Vec<Topic>,
    pub member_word_counts: BTreeMap<String, WordCounts>,
    pub member_message_counts: BTreeMap<String, u64>,
}

impl ChatRecord {
    /// Attach an id to a parsed chat.
    pub fn from_parsed(id: ChatId, parsed: ParsedChat) -> Self {
        Self {
            id,
            name: parsed.name,
            dates: parsed.dates,
            source: parsed.source,
            is_group: parsed.is_group,
            topics: parsed.topics,
            member_word_counts: parsed.member_word_counts,
            member_message_counts: parsed.member_message_counts,
        }
    }

    /// Label shown in the loaded-file list.
    pub fn display_name(&self) -> String {
        match &self.source {
            Some(source) => format!("{} ({})", self.name, source),
            None => self.name.clone(),
        }
    }
}
