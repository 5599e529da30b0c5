//! Chart payloads for an external renderer.
//!
//! The payload mirrors the data/dataset layout most JavaScript charting
//! libraries accept (`labels` plus `datasets` of `data` arrays), serialized
//! with camelCase keys.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{SeriesColors, ViewConfig};
use crate::smoothing::moving_average;
use crate::{Series, TimePeriod};

const MOVING_AVERAGE_BORDER: &str = "rgba(108, 117, 125, 1)";
const MOVING_AVERAGE_BACKGROUND: &str = "rgba(108, 117, 125, 0.2)";

/// How datasets are drawn relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    /// Bars side by side
    #[default]
    Grouped,
    /// Bars stacked per bucket
    Stacked,
    /// Lines
    Line,
}

/// Error returned when parsing an unknown chart style.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown chart style '{0}' (expected grouped, stacked or line)")]
pub struct ParseStyleError(String);

impl ChartStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartStyle::Grouped => "grouped",
            ChartStyle::Stacked => "stacked",
            ChartStyle::Line => "line",
        }
    }

    /// Renderer chart type for this style.
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartStyle::Line => ChartKind::Line,
            ChartStyle::Grouped | ChartStyle::Stacked => ChartKind::Bar,
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(ChartStyle::Grouped),
            "stacked" => Ok(ChartStyle::Stacked),
            "line" => Ok(ChartStyle::Line),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

/// Renderer chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One dataset of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    /// Overrides the chart type for this dataset
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl ChartDataset {
    /// A plain count dataset.
    pub fn counts(label: impl Into<String>, values: &[u64], colors: &SeriesColors) -> Self {
        Self {
            label: label.into(),
            data: values.iter().map(|v| *v as f64).collect(),
            background_color: colors.background.clone(),
            border_color: colors.border.clone(),
            border_width: 1,
            kind: None,
            fill: None,
            point_radius: None,
            tension: None,
        }
    }

    /// Trailing moving average of `totals`, drawn as a grey line.
    pub fn moving_average(window: usize, totals: &[u64]) -> Self {
        let values: Vec<f64> = totals.iter().map(|v| *v as f64).collect();
        Self {
            label: format!("{}-period moving average", window),
            data: moving_average(&values, window),
            background_color: MOVING_AVERAGE_BACKGROUND.to_string(),
            border_color: MOVING_AVERAGE_BORDER.to_string(),
            border_width: 2,
            kind: Some(ChartKind::Line),
            fill: Some(false),
            point_radius: Some(0),
            tension: Some(0.2),
        }
    }

    fn into_line(self) -> Self {
        Self {
            fill: Some(false),
            point_radius: Some(0),
            tension: Some(0.25),
            border_width: 2,
            ..self
        }
    }
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub stacked: bool,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Options for one chart render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartOptions {
    pub period: TimePeriod,
    pub style: ChartStyle,
    pub moving_average: bool,
}

/// Turn a bucketed series into a chart.
///
/// `title_base` is the chat name (or "All sources"); the moving-average
/// overlay tracks the total across all datasets.
pub fn build_chart(
    series: &Series,
    title_base: Option<&str>,
    config: &ViewConfig,
    options: ChartOptions,
) -> ChartData {
    let period_label = config.period_labels.get(options.period);
    let per_period = format!("{} per {}", config.item_label, period_label);
    let title = match title_base.filter(|b| !b.is_empty()) {
        Some(base) => format!("{} - {}", base, per_period),
        None => per_period.clone(),
    };

    let mut datasets = match series {
        Series::Single(single) => vec![ChartDataset::counts(
            per_period,
            &single.values,
            &SeriesColors::from_palette(0),
        )],
        Series::BySource(multi) => multi
            .datasets
            .iter()
            .map(|d| {
                ChartDataset::counts(
                    format!("{} {}", d.source, config.item_label),
                    &d.values,
                    &d.colors,
                )
            })
            .collect(),
    };

    if options.moving_average {
        if let Some(window) = config.moving_average_windows.get(options.period) {
            datasets.push(ChartDataset::moving_average(window, &series.totals()));
        }
    }

    if options.style == ChartStyle::Line {
        datasets = datasets.into_iter().map(ChartDataset::into_line).collect();
    }

    ChartData {
        kind: options.style.kind(),
        stacked: options.style == ChartStyle::Stacked,
        title,
        x_axis_title: period_label.to_string(),
        y_axis_title: format!("Number of {}", config.item_label),
        labels: series.labels().to_vec(),
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{SourceDataset, SourceSeries};
    use crate::TimeSeries;
    use pretty_assertions::assert_eq;

    fn single() -> Series {
        Series::Single(TimeSeries {
            keys: vec!["2024-01".into(), "2024-02".into(), "2024-03".into()],
            labels: vec!["Jan 2024".into(), "Feb 2024".into(), "Mar 2024".into()],
            values: vec![3, 6, 9],
        })
    }

    #[test]
    fn test_parse_style() {
        assert_eq!("stacked".parse::<ChartStyle>(), Ok(ChartStyle::Stacked));
        assert_eq!("Line".parse::<ChartStyle>(), Ok(ChartStyle::Line));
        assert!("pie".parse::<ChartStyle>().is_err());
    }

    #[test]
    fn test_single_chart_titles() {
        let chart = build_chart(
            &single(),
            Some("Family"),
            &ViewConfig::default(),
            ChartOptions::default(),
        );
        assert_eq!(chart.kind, ChartKind::Bar);
        assert!(!chart.stacked);
        assert_eq!(chart.title, "Family - Messages per Month");
        assert_eq!(chart.x_axis_title, "Month");
        assert_eq!(chart.y_axis_title, "Number of Messages");
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Messages per Month");
        assert_eq!(chart.datasets[0].data, vec![3.0, 6.0, 9.0]);

        let chart = build_chart(&single(), None, &ViewConfig::default(), ChartOptions::default());
        assert_eq!(chart.title, "Messages per Month");
    }

    #[test]
    fn test_moving_average_overlay() {
        let options = ChartOptions {
            period: TimePeriod::Month,
            style: ChartStyle::Grouped,
            moving_average: true,
        };
        let chart = build_chart(&single(), None, &ViewConfig::default(), options);
        assert_eq!(chart.datasets.len(), 2);
        let overlay = &chart.datasets[1];
        assert_eq!(overlay.label, "3-period moving average");
        assert_eq!(overlay.kind, Some(ChartKind::Line));
        assert_eq!(overlay.data, vec![3.0, 4.5, 6.0]);
    }

    #[test]
    fn test_moving_average_sums_sources() {
        let series = Series::BySource(SourceSeries {
            keys: vec!["2024-03".into(), "2024-04".into()],
            labels: vec!["Mar 2024".into(), "Apr 2024".into()],
            datasets: vec![
                SourceDataset {
                    source: "Claude".into(),
                    colors: SeriesColors::from_palette(0),
                    values: vec![3, 0],
                },
                SourceDataset {
                    source: "OpenAI".into(),
                    colors: SeriesColors::from_palette(1),
                    values: vec![0, 2],
                },
            ],
        });
        let options = ChartOptions {
            period: TimePeriod::Month,
            style: ChartStyle::Stacked,
            moving_average: true,
        };
        let chart = build_chart(
            &series,
            Some("All sources"),
            &ViewConfig::conversations(),
            options,
        );

        assert!(chart.stacked);
        assert_eq!(chart.title, "All sources - Conversations per Month");
        let labels: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Claude Conversations",
                "OpenAI Conversations",
                "3-period moving average"
            ]
        );
        assert_eq!(chart.datasets[2].data, vec![3.0, 2.5]);
    }

    #[test]
    fn test_no_overlay_without_window() {
        let options = ChartOptions {
            period: TimePeriod::Year,
            style: ChartStyle::Grouped,
            moving_average: true,
        };
        let chart = build_chart(&single(), None, &ViewConfig::conversations(), options);
        assert_eq!(chart.datasets.len(), 1);
    }

    #[test]
    fn test_line_style() {
        let options = ChartOptions {
            period: TimePeriod::Month,
            style: ChartStyle::Line,
            moving_average: true,
        };
        let chart = build_chart(&single(), None, &ViewConfig::default(), options);
        assert_eq!(chart.kind, ChartKind::Line);
        assert!(chart
            .datasets
            .iter()
            .all(|d| d.tension == Some(0.25) && d.border_width == 2 && d.fill == Some(false)));

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["datasets"][0]["pointRadius"], 0);
        assert!(json["datasets"][0].get("backgroundColor").is_some());
    }
}
