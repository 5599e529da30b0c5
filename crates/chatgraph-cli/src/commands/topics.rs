//! Topics command - Per-topic activity of a forum group export.

use anyhow::Result;
use chatgraph_core::{TopicDashboard, HOURS_PER_DAY};
use std::path::Path;

use super::load::load_chat;

/// Members listed per topic in text output.
const TOP_MEMBERS: usize = 10;

pub fn run(path: &Path, member_limit: Option<usize>, json: bool) -> Result<()> {
    let (session, id) = load_chat(path)?;
    let dashboards = session.topic_dashboards(id, member_limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboards)?);
        return Ok(());
    }

    if dashboards.is_empty() {
        println!("No topics found.");
        return Ok(());
    }

    for (i, dashboard) in dashboards.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_dashboard(dashboard);
    }

    println!("\n{} topic(s) with activity.", dashboards.len());
    Ok(())
}

fn print_dashboard(dashboard: &TopicDashboard) {
    println!("{} (id {})", dashboard.name, dashboard.id);
    println!("{}", "-".repeat(60));
    println!("Messages:     {}", dashboard.total_messages);
    println!("Members:      {}", dashboard.members.len());

    // Earliest hour wins ties
    let peak = (0..HOURS_PER_DAY).max_by_key(|h| (dashboard.hour_counts[*h], HOURS_PER_DAY - h));
    if let Some(peak) = peak {
        if dashboard.hour_counts[peak] > 0 {
            println!(
                "Busiest hour: {:02}:00 ({} messages)",
                peak, dashboard.hour_counts[peak]
            );
        }
    }

    println!();
    for member in dashboard.members.iter().take(TOP_MEMBERS) {
        println!("  {:<30} {:>6}", member.member, member.count);
    }
    if dashboard.members.len() > TOP_MEMBERS {
        println!("  ... and {} more", dashboard.members.len() - TOP_MEMBERS);
    }

    println!();
    println!("  Hours: {}", sparkline(&dashboard.hour_counts));
}

/// One character per hour, scaled to the busiest hour.
fn sparkline(hours: &[u64]) -> String {
    const LEVELS: [char; 5] = ['.', '\u{2581}', '\u{2583}', '\u{2585}', '\u{2587}'];
    let max = hours.iter().copied().max().unwrap_or(0);
    hours
        .iter()
        .map(|&count| {
            if count == 0 || max == 0 {
                LEVELS[0]
            } else {
                let level = (count * (LEVELS.len() as u64 - 1)).div_ceil(max) as usize;
                LEVELS[level.clamp(1, LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales_to_peak() {
        let mut hours = [0u64; HOURS_PER_DAY];
        hours[9] = 4;
        hours[10] = 1;
        let line = sparkline(&hours);
        assert_eq!(line.chars().count(), HOURS_PER_DAY);
        assert_eq!(line.chars().next(), Some('.'));
        assert_eq!(line.chars().nth(9), Some('\u{2587}'));
        assert_eq!(line.chars().nth(10), Some('\u{2581}'));
    }
}
