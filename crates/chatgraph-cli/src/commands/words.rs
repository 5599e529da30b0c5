//! Words command - Most frequent words per member.

use anyhow::Result;
use std::path::Path;

use super::load::load_chat;

pub fn run(path: &Path, member: Option<&str>, limit: usize, json: bool) -> Result<()> {
    let (session, id) = load_chat(path)?;
    let clouds = session.word_clouds(id, member, limit)?;

    if let (Some(member), true) = (member, clouds.is_empty()) {
        anyhow::bail!("No text messages from member '{}'", member);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&clouds)?);
        return Ok(());
    }

    if clouds.is_empty() {
        println!("No text messages found.");
        return Ok(());
    }

    for (i, cloud) in clouds.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({} messages)", cloud.member, cloud.messages);
        if cloud.words.is_empty() {
            println!("  (no words)");
            continue;
        }
        for word in &cloud.words {
            println!("  {:<24} {:>6}  {:.2}", word.word, word.count, word.weight);
        }
    }

    Ok(())
}
