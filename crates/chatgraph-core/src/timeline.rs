//! Time bucketing.
//!
//! Raw dates are grouped into day, month or year buckets. Bucket keys are
//! zero-padded (`2024`, `2024-01`, `2024-01-05`) so plain string ordering is
//! chronological ordering, and the sorted key set is turned into display
//! labels only at the very end.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::DateValue;

/// Largest absolute epoch offset a date may have, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Naive timestamp layouts, interpreted in the bucketing time zone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    #[default]
    Month,
    Year,
}

/// Error returned when parsing an unknown period name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown time period '{0}' (expected day, month or year)")]
pub struct ParsePeriodError(String);

impl TimePeriod {
    /// Get the string identifier for this period.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Day => "day",
            TimePeriod::Month => "month",
            TimePeriod::Year => "year",
        }
    }

    /// Canonical bucket key of a date in its own time zone.
    pub fn bucket_key<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> String {
        match self {
            TimePeriod::Year => format!("{:04}", date.year()),
            TimePeriod::Month => format!("{:04}-{:02}", date.year(), date.month()),
            TimePeriod::Day => format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                date.month(),
                date.day()
            ),
        }
    }

    /// Human-readable label for a bucket key, e.g. `Jan 2024`.
    ///
    /// Keys that do not parse back are returned unchanged.
    pub fn format_label(&self, key: &str) -> String {
        match self {
            TimePeriod::Year => key.to_string(),
            TimePeriod::Month => NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|_| key.to_string()),
            TimePeriod::Day => NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|_| key.to_string()),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimePeriod::Day),
            "month" => Ok(TimePeriod::Month),
            "year" => Ok(TimePeriod::Year),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// Parse a raw date into the given time zone.
///
/// Text with an offset is converted, naive date-times are taken as local
/// to `tz`, and a bare `YYYY-MM-DD` is UTC midnight. Returns `None` for
/// anything that is not a valid date.
pub fn parse_date<Tz: TimeZone>(value: &DateValue, tz: &Tz) -> Option<DateTime<Tz>> {
    match value {
        DateValue::Text(text) => parse_date_text(text.trim(), tz),
        DateValue::EpochMillis(ms) => {
            if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS {
                return None;
            }
            tz.timestamp_millis_opt(ms.trunc() as i64).single()
        }
    }
}

fn parse_date_text<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = text.parse::<DateTime<FixedOffset>>() {
        return Some(date.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
}

/// Count dates per bucket key. Unparseable dates are dropped.
///
/// The returned map iterates in chronological order.
pub fn bucket_counts<'a, I, Tz>(dates: I, period: TimePeriod, tz: &Tz) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a DateValue>,
    Tz: TimeZone,
{
    let mut counts = BTreeMap::new();
    let mut dropped = 0usize;

    for value in dates {
        match parse_date(value, tz) {
            Some(date) => *counts.entry(period.bucket_key(&date)).or_insert(0) += 1,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, period = %period, "dropped unparseable dates");
    }

    counts
}

/// A sorted, labeled count series for one chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    /// Bucket keys in chronological order
    pub keys: Vec<String>,
    /// Display labels, co-indexed with `keys`
    pub labels: Vec<String>,
    /// Counts, co-indexed with `keys`
    pub values: Vec<u64>,
}

impl TimeSeries {
    /// Build a series from per-key counts.
    pub fn from_counts(counts: BTreeMap<String, u64>, period: TimePeriod) -> Self {
        let mut series = TimeSeries::default();
        for (key, count) in counts {
            series.labels.push(period.format_label(&key));
            series.keys.push(key);
            series.values.push(count);
        }
        series
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// Bucket a sequence of raw dates into a labeled series.
pub fn bucket_dates<'a, I, Tz>(dates: I, period: TimePeriod, tz: &Tz) -> TimeSeries
where
    I: IntoIterator<Item = &'a DateValue>,
    Tz: TimeZone,
{
    TimeSeries::from_counts(bucket_counts(dates, period, tz), period)
}
