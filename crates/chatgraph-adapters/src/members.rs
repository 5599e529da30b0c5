//! Per-member message and word totals for chat exports.

use chatgraph_core::{tokenize, WordCounts};
use std::collections::BTreeMap;

use crate::group_chat::RawMessage;

/// Word frequencies and text-message counts keyed by member.
#[derive(Debug, Default)]
pub(crate) struct MemberStats {
    pub(crate) word_counts: BTreeMap<String, WordCounts>,
    pub(crate) message_counts: BTreeMap<String, u64>,
}

impl MemberStats {
    /// Tally every `message` entry that has both a sender and non-blank text.
    ///
    /// A member whose messages contain only stopwords still gets a message
    /// count and an empty word map.
    pub(crate) fn from_messages(messages: &[RawMessage]) -> Self {
        let mut stats = MemberStats::default();

        for message in messages.iter().filter(|m| m.is_message()) {
            let (Some(member), Some(text)) = (message.member(), message.text()) else {
                continue;
            };

            *stats.message_counts.entry(member.clone()).or_insert(0) += 1;
            let words = stats.word_counts.entry(member).or_default();
            for token in tokenize(&text) {
                *words.entry(token).or_insert(0) += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_counts_words_per_member() {
        let messages: Vec<RawMessage> = [
            json!({"type": "message", "from": "Alice", "text": "Rust compiler rocks"}),
            json!({"type": "message", "from": "Alice", "text": ["rust", {"type": "bold", "text": "borrow"}]}),
            json!({"type": "message", "from": "Bob", "text": "the and for"}),
            json!({"type": "message", "from": "Carol", "text": ""}),
            json!({"type": "message", "text": "anonymous words"}),
            json!({"type": "service", "actor": "Admin", "text": "pinned message"}),
        ]
        .iter()
        .map(RawMessage::from_value)
        .collect();

        let stats = MemberStats::from_messages(&messages);

        assert_eq!(stats.message_counts.get("Alice"), Some(&2));
        assert_eq!(stats.message_counts.get("Bob"), Some(&1));
        assert_eq!(stats.message_counts.len(), 2);

        let alice = &stats.word_counts["Alice"];
        assert_eq!(alice.get("rust"), Some(&2));
        assert_eq!(alice.get("borrow"), Some(&1));
        assert_eq!(alice.get("compiler"), Some(&1));
        assert!(stats.word_counts["Bob"].is_empty());
    }
}
