//! Info command - List loaded files with their date range and contents.

use anyhow::Result;
use chatgraph_adapters::InputKind;
use chatgraph_core::{parse_date, ChatRecord, Session, ViewConfig};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

use super::load::load_files;

#[derive(Serialize)]
struct FileInfo {
    id: String,
    label: String,
    name: String,
    source: Option<String>,
    dates: usize,
    first: Option<String>,
    last: Option<String>,
    is_group: bool,
    topics: usize,
    members: usize,
}

impl FileInfo {
    fn from_record(record: &ChatRecord, tz: &Local) -> Self {
        let parsed: Vec<DateTime<Local>> = record
            .dates
            .iter()
            .filter_map(|d| parse_date(d, tz))
            .collect();
        let day = |d: &DateTime<Local>| d.format("%Y-%m-%d").to_string();

        Self {
            id: record.id.to_string(),
            label: record.display_name(),
            name: record.name.clone(),
            source: record.source.clone(),
            dates: parsed.len(),
            first: parsed.iter().min().map(day),
            last: parsed.iter().max().map(day),
            is_group: record.is_group,
            topics: record.topics.iter().filter(|t| t.has_data()).count(),
            members: record.member_message_counts.len(),
        }
    }
}

pub fn run(files: &[PathBuf], json: bool) -> Result<()> {
    let mut session = Session::new(ViewConfig::chats());
    load_files(&mut session, files, InputKind::Auto)?;

    let infos: Vec<FileInfo> = session
        .records()
        .iter()
        .map(|r| FileInfo::from_record(r, session.timezone()))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!(
        "{:<40} {:>7}  {:<10}  {:<10}  {:>6} {:>7}",
        "FILE", "DATES", "FIRST", "LAST", "TOPICS", "MEMBERS"
    );
    println!("{}", "-".repeat(88));

    for info in &infos {
        let label = if info.label.chars().count() > 38 {
            format!("{}...", info.label.chars().take(35).collect::<String>())
        } else {
            info.label.clone()
        };
        let topics = if info.is_group {
            info.topics.to_string()
        } else {
            "-".to_string()
        };

        println!(
            "{:<40} {:>7}  {:<10}  {:<10}  {:>6} {:>7}",
            label,
            info.dates,
            info.first.as_deref().unwrap_or("-"),
            info.last.as_deref().unwrap_or("-"),
            topics,
            info.members
        );
    }

    println!("\n{} file(s) loaded.", infos.len());
    Ok(())
}
