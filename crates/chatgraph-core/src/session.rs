//! The session registry: loaded records and the views derived from them.

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::chart::{build_chart, ChartData, ChartOptions};
use crate::config::ViewConfig;
use crate::dashboard::{topic_dashboards, word_cloud, word_clouds, TopicDashboard, WordCloud};
use crate::sources::{aggregate_by_source, SourceSeries};
use crate::timeline::{bucket_dates, parse_date, TimePeriod, TimeSeries};
use crate::{ChatError, ChatId, ChatRecord, ChatResult, ParsedChat};

/// Title used for the merged chart when aggregating by source.
pub const ALL_SOURCES_TITLE: &str = "All sources";

/// A bucketed series: one chat, or every source side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Series {
    Single(TimeSeries),
    BySource(SourceSeries),
}

impl Series {
    /// Display labels, co-indexed with every value array.
    pub fn labels(&self) -> &[String] {
        match self {
            Series::Single(s) => &s.labels,
            Series::BySource(s) => &s.labels,
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.labels().len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    /// Total count per bucket across all datasets.
    pub fn totals(&self) -> Vec<u64> {
        match self {
            Series::Single(s) => s.values.clone(),
            Series::BySource(s) => s.totals(),
        }
    }
}

/// A row in the loaded-file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListEntry {
    pub id: ChatId,
    pub label: String,
}

/// Ordered registry of loaded records plus the current selection.
///
/// Records are immutable once stored; insertion order is display order.
/// Bucketing happens in `tz`, the local time zone by default.
#[derive(Debug)]
pub struct Session<Tz: TimeZone = Local> {
    config: ViewConfig,
    tz: Tz,
    records: Vec<ChatRecord>,
    selected: Option<ChatId>,
}

impl Session<Local> {
    /// Create an empty session bucketing in local time.
    pub fn new(config: ViewConfig) -> Self {
        Self::with_timezone(config, Local)
    }
}

impl<Tz: TimeZone> Session<Tz> {
    /// Create an empty session bucketing in `tz`.
    pub fn with_timezone(config: ViewConfig, tz: Tz) -> Self {
        Self {
            config,
            tz,
            records: Vec::new(),
            selected: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Time zone used for bucketing and hour-of-day statistics.
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Store a parsed chat and return its new id.
    ///
    /// Rejects chats where no date parses in the session time zone, which
    /// includes chats without any dates. In single-chat mode the new record
    /// becomes the selection.
    pub fn load(&mut self, parsed: ParsedChat) -> ChatResult<ChatId> {
        if !parsed.dates.iter().any(|d| parse_date(d, &self.tz).is_some()) {
            tracing::warn!(name = %parsed.name, "rejected file without dated items");
            return Err(ChatError::NoDatedItems);
        }

        let id = ChatId::generate();
        tracing::info!(
            %id,
            name = %parsed.name,
            dates = parsed.dates.len(),
            topics = parsed.topics.len(),
            "loaded chat"
        );
        self.records.push(ChatRecord::from_parsed(id, parsed));

        if !self.config.aggregate_by_source {
            self.selected = Some(id);
        }
        Ok(id)
    }

    /// Remove a record. The selection is cleared before the record is
    /// dropped so no view can refer to it afterwards.
    pub fn remove(&mut self, id: ChatId) -> ChatResult<ChatRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(ChatError::UnknownChat(id))?;

        if self.selected == Some(id) {
            self.selected = None;
        }
        let record = self.records.remove(index);
        tracing::info!(%id, name = %record.name, "removed chat");
        Ok(record)
    }

    /// Select a record for single-chat views. `None` clears the selection.
    pub fn select(&mut self, id: Option<ChatId>) -> ChatResult<()> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(ChatError::UnknownChat(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// The selected record, if any.
    pub fn selected(&self) -> Option<&ChatRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ChatId) -> Option<&ChatRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ChatRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows for the loaded-file list.
    pub fn file_list(&self) -> Vec<FileListEntry> {
        self.records
            .iter()
            .map(|r| FileListEntry {
                id: r.id,
                label: r.display_name(),
            })
            .collect()
    }

    /// Bucketed series for the current view.
    ///
    /// When aggregating by source this covers every record; otherwise only
    /// the selection, and an empty series when nothing is selected.
    pub fn series(&self, period: TimePeriod) -> Series {
        if self.config.aggregate_by_source {
            return Series::BySource(aggregate_by_source(
                &self.records,
                period,
                &self.config,
                &self.tz,
            ));
        }

        match self.selected() {
            Some(record) => Series::Single(bucket_dates(&record.dates, period, &self.tz)),
            None => Series::Single(TimeSeries::default()),
        }
    }

    /// Chart payload for the current view.
    pub fn chart(&self, options: ChartOptions) -> ChartData {
        let series = self.series(options.period);
        let title_base = if self.config.aggregate_by_source {
            Some(ALL_SOURCES_TITLE)
        } else {
            self.selected().map(|r| r.name.as_str())
        };
        build_chart(&series, title_base, &self.config, options)
    }

    /// Topic dashboards of a record; empty for records without topic data.
    pub fn topic_dashboards(
        &self,
        id: ChatId,
        member_limit: Option<usize>,
    ) -> ChatResult<Vec<TopicDashboard>> {
        let record = self.get(id).ok_or(ChatError::UnknownChat(id))?;
        Ok(topic_dashboards(record, member_limit))
    }

    /// Word cloud for one member of a record, or for every member.
    pub fn word_clouds(
        &self,
        id: ChatId,
        member: Option<&str>,
        limit: usize,
    ) -> ChatResult<Vec<WordCloud>> {
        let record = self.get(id).ok_or(ChatError::UnknownChat(id))?;
        Ok(match member {
            Some(member) => word_cloud(record, member, limit).into_iter().collect(),
            None => word_clouds(record, limit),
        })
    }
}
