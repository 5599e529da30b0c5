//! Forum topic reconstruction for group exports.
//!
//! Topics are identified three ways, in increasing priority:
//! 1. `topic_created` service records register a topic under their own id.
//! 2. A reply whose chain of `reply_to_message_id` links ends at a topic
//!    creation record belongs to that topic.
//! 3. Topic metadata embedded in the message overrides any inferred topic.
//!
//! Reply chains are resolved against a full id index, so a reply that
//! appears before its target in the export still resolves.

use chatgraph_core::{parse_date, Topic, HOURS_PER_DAY};
use chrono::{TimeZone, Timelike};
use std::collections::{HashMap, HashSet};

use crate::group_chat::RawMessage;

/// Topics in registration order with an id lookup.
#[derive(Debug, Default)]
struct TopicTable {
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
}

impl TopicTable {
    /// Register a topic, or upgrade a placeholder name when a real one is
    /// now known. A real name is never replaced.
    fn register(&mut self, id: &str, name: Option<&str>) -> &mut Topic {
        let slot = match self.index.get(id) {
            Some(slot) => *slot,
            None => {
                let name = name
                    .map(str::to_string)
                    .unwrap_or_else(|| Topic::default_name(id));
                self.topics.push(Topic::new(id, name));
                self.index.insert(id.to_string(), self.topics.len() - 1);
                self.topics.len() - 1
            }
        };

        let topic = &mut self.topics[slot];
        if let Some(name) = name {
            if topic.has_default_name() {
                topic.name = name.to_string();
            }
        }
        topic
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

/// Map every reply to the topic-creation id its chain leads to.
///
/// Each chain is walked once; intermediate messages are memoized and cycles
/// resolve to no topic.
fn resolve_reply_chains(messages: &[RawMessage], roots: &TopicTable) -> HashMap<String, String> {
    let reply_to: HashMap<String, String> = messages
        .iter()
        .filter_map(|m| Some((m.id()?, m.reply_to()?)))
        .collect();

    let mut resolved: HashMap<String, Option<String>> = HashMap::new();

    for start in reply_to.keys() {
        if resolved.contains_key(start) {
            continue;
        }

        let mut path: Vec<&String> = Vec::new();
        let mut visited: HashSet<&String> = HashSet::new();
        let mut current = start;

        let topic = loop {
            if let Some(known) = resolved.get(current) {
                break known.clone();
            }
            if !visited.insert(current) {
                break None;
            }
            match reply_to.get(current) {
                Some(target) => {
                    path.push(current);
                    if roots.contains(target) {
                        break Some(target.clone());
                    }
                    current = target;
                }
                None => break None,
            }
        };

        for id in path {
            resolved.insert(id.clone(), topic.clone());
        }
    }

    resolved
        .into_iter()
        .filter_map(|(id, topic)| topic.map(|t| (id, t)))
        .collect()
}

/// Rebuild forum topics and their per-member statistics.
///
/// Only `message` entries with a resolvable sender count toward a topic's
/// statistics. Hour histograms use the local hour in `tz`; messages whose
/// date does not parse still count toward member totals.
pub(crate) fn reconstruct_topics<Tz: TimeZone>(messages: &[RawMessage], tz: &Tz) -> Vec<Topic> {
    let mut table = TopicTable::default();

    for message in messages.iter().filter(|m| m.is_topic_created()) {
        if let Some(id) = message.id() {
            table.register(&id, message.title());
        }
    }

    let inferred = resolve_reply_chains(messages, &table);

    for message in messages {
        let topic = match message.embedded_topic() {
            Some((id, name)) => table.register(&id, name.as_deref()),
            None => {
                let Some(id) = message.id().and_then(|id| inferred.get(&id)) else {
                    continue;
                };
                table.register(id, None)
            }
        };

        if !message.is_message() {
            continue;
        }
        let Some(member) = message.member() else {
            continue;
        };

        *topic.member_counts.entry(member.clone()).or_insert(0) += 1;

        let hour = message
            .date()
            .and_then(|date| parse_date(&date, tz))
            .map(|date| date.hour() as usize);
        if let Some(hour) = hour {
            topic.hour_counts[hour] += 1;
            topic
                .member_hour_counts
                .entry(member)
                .or_insert([0; HOURS_PER_DAY])[hour] += 1;
        }
    }

    table.topics
}
