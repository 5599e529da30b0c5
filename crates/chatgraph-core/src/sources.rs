//! Multi-source aggregation.
//!
//! Records are grouped by their provenance label and each group is bucketed
//! independently. All groups are then aligned on the union of bucket keys so
//! every dataset has a value (possibly zero) for every label.

use chrono::TimeZone;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{SeriesColors, ViewConfig, UNKNOWN_SOURCE};
use crate::timeline::{bucket_counts, TimePeriod};
use crate::{ChatRecord, DateValue};

/// One source's counts, aligned to the parent series' keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDataset {
    pub source: String,
    pub colors: SeriesColors,
    pub values: Vec<u64>,
}

/// Dense multi-source series: every dataset is co-indexed with `keys`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceSeries {
    pub keys: Vec<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<SourceDataset>,
}

impl SourceSeries {
    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sum across all datasets for each bucket.
    pub fn totals(&self) -> Vec<u64> {
        let mut totals = vec![0; self.keys.len()];
        for dataset in &self.datasets {
            for (total, value) in totals.iter_mut().zip(&dataset.values) {
                *total += value;
            }
        }
        totals
    }

    /// Look up a dataset by source label.
    pub fn dataset(&self, source: &str) -> Option<&SourceDataset> {
        self.datasets.iter().find(|d| d.source == source)
    }
}

/// Order sources: preferred ones first in preferred order, then the rest in
/// first-encountered order.
pub fn order_sources(encountered: &[String], preferred: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(encountered.len());

    for source in preferred.iter().chain(encountered) {
        if encountered.contains(source) && !ordered.contains(source) {
            ordered.push(source.clone());
        }
    }

    ordered
}

/// Merge records into one series per source.
pub fn aggregate_by_source<'a, I, Tz>(
    records: I,
    period: TimePeriod,
    config: &ViewConfig,
    tz: &Tz,
) -> SourceSeries
where
    I: IntoIterator<Item = &'a ChatRecord>,
    Tz: TimeZone,
{
    let mut encountered: Vec<String> = Vec::new();
    let mut dates_by_source: BTreeMap<String, Vec<&DateValue>> = BTreeMap::new();

    for record in records {
        let source = record.source.as_deref().unwrap_or(UNKNOWN_SOURCE);
        if !dates_by_source.contains_key(source) {
            encountered.push(source.to_string());
        }
        dates_by_source
            .entry(source.to_string())
            .or_default()
            .extend(record.dates.iter());
    }

    if encountered.is_empty() {
        return SourceSeries::default();
    }

    let counts_by_source: BTreeMap<&str, BTreeMap<String, u64>> = dates_by_source
        .iter()
        .map(|(source, dates)| {
            (
                source.as_str(),
                bucket_counts(dates.iter().copied(), period, tz),
            )
        })
        .collect();

    let keys: Vec<String> = counts_by_source
        .values()
        .flat_map(|counts| counts.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let datasets = order_sources(&encountered, &config.source_order)
        .into_iter()
        .enumerate()
        .map(|(index, source)| {
            let counts = counts_by_source.get(source.as_str());
            let values = keys
                .iter()
                .map(|key| counts.and_then(|c| c.get(key)).copied().unwrap_or(0))
                .collect();
            SourceDataset {
                colors: config.colors_for(&source, index),
                source,
                values,
            }
        })
        .collect();

    SourceSeries {
        labels: keys.iter().map(|k| period.format_label(k)).collect(),
        keys,
        datasets,
    }
}
