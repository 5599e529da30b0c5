//! Timeline command - Bucketed counts as a table, series JSON, or chart payload.

use anyhow::Result;
use chatgraph_core::{ChartData, ChartOptions, ChartStyle, Series, Session, TimePeriod};
use clap::Args;
use std::path::PathBuf;

use super::load::{build_config, load_files, Preset};

/// Minimum width of a value column.
const VALUE_WIDTH: usize = 8;

#[derive(Args)]
pub struct TimelineArgs {
    /// Export files (group/DM chats or conversation arrays)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Bucket size: day, month or year (defaults to the view's period)
    #[arg(short, long)]
    pub period: Option<TimePeriod>,

    /// Merge all files into one series per source
    #[arg(long)]
    pub by_source: bool,

    /// Chart style: grouped, stacked or line
    #[arg(short, long, default_value = "grouped")]
    pub style: ChartStyle,

    /// Add a trailing moving average of the totals
    #[arg(long)]
    pub moving_average: bool,

    /// Print the chart payload JSON for a renderer
    #[arg(long)]
    pub chart: bool,

    /// Built-in view configuration
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// TOML view configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output the bucketed series as JSON
    #[arg(long)]
    pub json: bool,
}

/// One rendered view: a single chat, or all sources merged.
struct TimelineView {
    series: Series,
    chart: ChartData,
}

impl TimelineView {
    fn current(session: &Session, options: ChartOptions) -> Self {
        Self {
            series: session.series(options.period),
            chart: session.chart(options),
        }
    }
}

pub fn run(args: &TimelineArgs) -> Result<()> {
    let mut config = build_config(args.preset, args.config.as_deref())?;
    if args.by_source {
        config.aggregate_by_source = true;
    }

    let options = ChartOptions {
        period: args.period.unwrap_or(config.default_period),
        style: args.style,
        moving_average: args.moving_average,
    };
    let kind = args.preset.map(Preset::input_kind).unwrap_or_default();

    let mut session = Session::new(config);
    let ids = load_files(&mut session, &args.files, kind)?;

    let views = if session.config().aggregate_by_source {
        vec![TimelineView::current(&session, options)]
    } else {
        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
            session.select(Some(id))?;
            views.push(TimelineView::current(&session, options));
        }
        views
    };

    if args.chart {
        let charts: Vec<&ChartData> = views.iter().map(|v| &v.chart).collect();
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else if args.json {
        let series: Vec<&Series> = views.iter().map(|v| &v.series).collect();
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        let item_label = session.config().item_label.to_lowercase();
        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_table(&view.chart, &view.series, &item_label);
        }
    }

    Ok(())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{:.2}", value)
    }
}

fn print_table(chart: &ChartData, series: &Series, item_label: &str) {
    println!("{}", chart.title);

    if chart.labels.is_empty() {
        println!("No dated {}.", item_label);
        return;
    }

    let period_header = chart.x_axis_title.to_uppercase();
    let label_width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(period_header.len()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = chart
        .datasets
        .iter()
        .map(|d| d.label.chars().count().max(VALUE_WIDTH))
        .collect();

    let mut header = format!("{:<width$}", period_header, width = label_width);
    for (dataset, width) in chart.datasets.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", dataset.label, width = width));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.chars().count()));

    for (row, label) in chart.labels.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = label_width);
        for (dataset, width) in chart.datasets.iter().zip(&widths) {
            let value = dataset.data.get(row).copied().unwrap_or(0.0);
            line.push_str(&format!("  {:>width$}", format_value(value), width = width));
        }
        println!("{}", line);
    }

    let total: u64 = series.totals().iter().sum();
    println!(
        "\n{} {} in {} period(s).",
        total,
        item_label,
        chart.labels.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.50");
        assert_eq!(format_value(1.0 / 3.0), "0.33");
    }
}
