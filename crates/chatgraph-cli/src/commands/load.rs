//! Shared helpers for building a session and loading export files into it.

use anyhow::{Context, Result};
use chatgraph_adapters::{load_path, InputKind};
use chatgraph_core::{ChatId, Session, ViewConfig};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Built-in view configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Group and DM chat exports, one chat at a time
    Chats,
    /// AI conversation exports merged by provider
    Conversations,
}

impl Preset {
    pub fn config(self) -> ViewConfig {
        match self {
            Preset::Chats => ViewConfig::chats(),
            Preset::Conversations => ViewConfig::conversations(),
        }
    }

    /// Export shapes accepted under this preset.
    pub fn input_kind(self) -> InputKind {
        match self {
            Preset::Chats => InputKind::Messages,
            Preset::Conversations => InputKind::Conversations,
        }
    }
}

/// Resolve the view configuration: a config file wins over the preset.
pub fn build_config(preset: Option<Preset>, config: Option<&Path>) -> Result<ViewConfig> {
    match config {
        Some(path) => ViewConfig::from_path(path)
            .with_context(|| format!("Failed to read config: {:?}", path)),
        None => Ok(preset.map(Preset::config).unwrap_or_else(ViewConfig::chats)),
    }
}

/// Load each file independently. Failures are reported and skipped; only
/// an empty result is an error.
pub fn load_files(session: &mut Session, files: &[PathBuf], kind: InputKind) -> Result<Vec<ChatId>> {
    let mut loaded = Vec::new();

    for path in files {
        tracing::debug!(path = %path.display(), "loading file");
        let result = match load_path(path, kind, session.timezone()) {
            Ok(parsed) => session.load(parsed),
            Err(err) => Err(err),
        };

        match result {
            Ok(id) => loaded.push(id),
            Err(err) => eprintln!("Error loading file: {}: {}", path.display(), err),
        }
    }

    if loaded.is_empty() {
        anyhow::bail!("No files could be loaded");
    }
    Ok(loaded)
}

/// Load a single chat export into a fresh session.
pub fn load_chat(path: &Path) -> Result<(Session, ChatId)> {
    let mut session = Session::new(ViewConfig::chats());
    let parsed = load_path(path, InputKind::Auto, session.timezone())
        .with_context(|| format!("Error loading file: {:?}", path))?;
    let id = session
        .load(parsed)
        .with_context(|| format!("Error loading file: {:?}", path))?;
    Ok((session, id))
}
