//! Topic dashboards and per-member word clouds.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::{ChatRecord, HourHistogram, Topic, WordCounts};

/// A member and how many messages they sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCount {
    pub member: String,
    pub count: u64,
}

/// A member's hour-of-day activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberHours {
    pub member: String,
    pub hours: HourHistogram,
}

/// Derived view of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicDashboard {
    pub id: String,
    pub name: String,
    pub total_messages: u64,
    /// Members by message count, most active first
    pub members: Vec<MemberCount>,
    pub hour_counts: HourHistogram,
    /// Hour heatmap rows for the most active members
    pub member_hours: Vec<MemberHours>,
}

/// Sort members by count descending, then by name.
pub fn ranked_members(counts: &BTreeMap<String, u64>) -> Vec<MemberCount> {
    let mut members: Vec<MemberCount> = counts
        .iter()
        .map(|(member, count)| MemberCount {
            member: member.clone(),
            count: *count,
        })
        .collect();
    // BTreeMap iteration is already name-ordered and the sort is stable
    members.sort_by(|a, b| b.count.cmp(&a.count));
    members
}

impl TopicDashboard {
    /// Build the dashboard for a topic, keeping at most `member_limit`
    /// heatmap rows.
    pub fn from_topic(topic: &Topic, member_limit: Option<usize>) -> Self {
        let members = ranked_members(&topic.member_counts);
        let member_hours = members
            .iter()
            .take(member_limit.unwrap_or(usize::MAX))
            .filter_map(|m| {
                topic.member_hour_counts.get(&m.member).map(|hours| MemberHours {
                    member: m.member.clone(),
                    hours: *hours,
                })
            })
            .collect();

        Self {
            id: topic.id.clone(),
            name: topic.name.clone(),
            total_messages: topic.total_messages(),
            members,
            hour_counts: topic.hour_counts,
            member_hours,
        }
    }
}

/// Dashboards for every topic that has member data, in topic order.
pub fn topic_dashboards(record: &ChatRecord, member_limit: Option<usize>) -> Vec<TopicDashboard> {
    record
        .topics
        .iter()
        .filter(|topic| topic.has_data())
        .map(|topic| TopicDashboard::from_topic(topic, member_limit))
        .collect()
}

/// A word and its size in a cloud.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub count: u64,
    /// Count relative to the most frequent word, in `(0, 1]`
    pub weight: f64,
}

/// A member's most frequent words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloud {
    pub member: String,
    pub messages: u64,
    pub words: Vec<WordWeight>,
}

fn top_words(counts: &WordCounts, limit: usize) -> Vec<WordWeight> {
    let mut words: Vec<(&String, u64)> = counts.iter().map(|(w, c)| (w, *c)).collect();
    words.sort_by(|a, b| b.1.cmp(&a.1));
    words.truncate(limit);

    let max = words.first().map(|(_, c)| *c).unwrap_or(0);
    words
        .into_iter()
        .map(|(word, count)| WordWeight {
            word: word.clone(),
            count,
            weight: if max == 0 {
                0.0
            } else {
                count as f64 / max as f64
            },
        })
        .collect()
}

/// Word cloud for one member, or `None` if they have no words.
pub fn word_cloud(record: &ChatRecord, member: &str, limit: usize) -> Option<WordCloud> {
    let counts = record.member_word_counts.get(member)?;
    Some(WordCloud {
        member: member.to_string(),
        messages: record.member_message_counts.get(member).copied().unwrap_or(0),
        words: top_words(counts, limit),
    })
}

/// Word clouds for every member, most active first.
pub fn word_clouds(record: &ChatRecord, limit: usize) -> Vec<WordCloud> {
    ranked_members(&record.member_message_counts)
        .iter()
        .filter_map(|m| word_cloud(record, &m.member, limit))
        .collect()
}
