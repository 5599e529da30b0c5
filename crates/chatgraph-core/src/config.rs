//! View configuration.
//!
//! Every option a timeline view recognizes is enumerated here with its
//! default. A configuration is built once (from a preset or a TOML file)
//! and handed to [`crate::Session::new`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{ChatResult, TimePeriod};

/// Fallback source label for records without provenance.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Colors used for series without an explicit override, by position.
const PALETTE: [(&str, &str); 3] = [
    ("rgba(54, 162, 235, 0.5)", "rgba(54, 162, 235, 1)"),
    ("rgba(40, 167, 69, 0.5)", "rgba(40, 167, 69, 1)"),
    ("rgba(255, 193, 7, 0.5)", "rgba(255, 193, 7, 1)"),
];

/// Fill and border color of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColors {
    pub background: String,
    pub border: String,
}

impl SeriesColors {
    pub fn new(background: impl Into<String>, border: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            border: border.into(),
        }
    }

    /// Palette entry for a series position, cycling through the palette.
    pub fn from_palette(index: usize) -> Self {
        let (background, border) = PALETTE[index % PALETTE.len()];
        Self::new(background, border)
    }
}

/// Axis and title wording for each period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodLabels {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl Default for PeriodLabels {
    fn default() -> Self {
        Self {
            day: "Day".to_string(),
            month: "Month".to_string(),
            year: "Year".to_string(),
        }
    }
}

impl PeriodLabels {
    pub fn get(&self, period: TimePeriod) -> &str {
        match period {
            TimePeriod::Day => &self.day,
            TimePeriod::Month => &self.month,
            TimePeriod::Year => &self.year,
        }
    }
}

/// Moving-average window per period. `None` or `0` disables the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageWindows {
    pub day: Option<usize>,
    pub month: Option<usize>,
    pub year: Option<usize>,
}

impl Default for MovingAverageWindows {
    fn default() -> Self {
        Self {
            day: Some(7),
            month: Some(3),
            year: Some(3),
        }
    }
}

impl MovingAverageWindows {
    /// Window for a period, if the overlay is enabled for it.
    pub fn get(&self, period: TimePeriod) -> Option<usize> {
        let window = match period {
            TimePeriod::Day => self.day,
            TimePeriod::Month => self.month,
            TimePeriod::Year => self.year,
        };
        window.filter(|w| *w > 0)
    }
}

/// Options for one timeline view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// What is being counted, e.g. "Messages"
    pub item_label: String,
    /// Wording for each period
    pub period_labels: PeriodLabels,
    /// Period used right after a file is loaded
    pub default_period: TimePeriod,
    /// Merge all loaded records into one chart keyed by source
    pub aggregate_by_source: bool,
    /// Sources listed here come first, in this order
    pub source_order: Vec<String>,
    /// Explicit colors per source, overriding the palette
    pub source_colors: BTreeMap<String, SeriesColors>,
    /// Moving-average windows
    pub moving_average_windows: MovingAverageWindows,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            item_label: "Messages".to_string(),
            period_labels: PeriodLabels::default(),
            default_period: TimePeriod::Month,
            aggregate_by_source: false,
            source_order: Vec::new(),
            source_colors: BTreeMap::new(),
            moving_average_windows: MovingAverageWindows::default(),
        }
    }
}

impl ViewConfig {
    /// One chat at a time, monthly by default.
    pub fn chats() -> Self {
        Self::default()
    }

    /// AI conversation exports merged by provider, daily by default.
    pub fn conversations() -> Self {
        let source_colors = [("Claude", 0), ("OpenAI", 1), (UNKNOWN_SOURCE, 2)]
            .into_iter()
            .map(|(source, slot)| (source.to_string(), SeriesColors::from_palette(slot)))
            .collect();

        Self {
            item_label: "Conversations".to_string(),
            default_period: TimePeriod::Day,
            aggregate_by_source: true,
            source_order: vec![
                "Claude".to_string(),
                "OpenAI".to_string(),
                UNKNOWN_SOURCE.to_string(),
            ],
            source_colors,
            moving_average_windows: MovingAverageWindows {
                day: Some(7),
                month: Some(3),
                year: None,
            },
            ..Self::default()
        }
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> ChatResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ChatResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Colors for a source at a given position in the series order.
    pub fn colors_for(&self, source: &str, index: usize) -> SeriesColors {
        self.source_colors
            .get(source)
            .cloned()
            .unwrap_or_else(|| SeriesColors::from_palette(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.item_label, "Messages");
        assert_eq!(config.default_period, TimePeriod::Month);
        assert!(!config.aggregate_by_source);
        assert_eq!(config.period_labels.get(TimePeriod::Day), "Day");
        assert_eq!(config.moving_average_windows.get(TimePeriod::Year), Some(3));
    }

    #[test]
    fn test_conversations_preset() {
        let config = ViewConfig::conversations();
        assert!(config.aggregate_by_source);
        assert_eq!(config.default_period, TimePeriod::Day);
        assert_eq!(config.moving_average_windows.get(TimePeriod::Day), Some(7));
        assert_eq!(config.moving_average_windows.get(TimePeriod::Year), None);
        assert_eq!(
            config.colors_for("OpenAI", 0),
            SeriesColors::new("rgba(40, 167, 69, 0.5)", "rgba(40, 167, 69, 1)")
        );
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(SeriesColors::from_palette(3), SeriesColors::from_palette(0));
        let config = ViewConfig::default();
        assert_eq!(config.colors_for("Anything", 4), SeriesColors::from_palette(1));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ViewConfig::from_toml_str(
            r#"
            item_label = "Posts"
            default_period = "year"
            source_order = ["B", "A"]

            [moving_average_windows]
            day = 0

            [source_colors.A]
            background = "red"
            border = "darkred"
            "#,
        )
        .unwrap();

        assert_eq!(config.item_label, "Posts");
        assert_eq!(config.default_period, TimePeriod::Year);
        assert_eq!(config.source_order, vec!["B", "A"]);
        assert_eq!(config.moving_average_windows.get(TimePeriod::Day), None);
        assert_eq!(config.moving_average_windows.get(TimePeriod::Month), Some(3));
        assert_eq!(config.colors_for("A", 0), SeriesColors::new("red", "darkred"));
        assert_eq!(config.period_labels, PeriodLabels::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_period() {
        assert!(ViewConfig::from_toml_str("default_period = \"week\"").is_err());
    }
}
