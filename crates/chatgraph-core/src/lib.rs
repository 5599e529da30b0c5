//! # chatgraph-core
//!
//! Data model and aggregation engine for chat-history timelines.
//!
//! Exported chats and AI-assistant conversation lists are normalized into
//! [`ParsedChat`] records (see `chatgraph-adapters`). This crate provides:
//! - Time bucketing into day/month/year series
//! - Trailing moving averages
//! - Merging records by source into aligned multi-series views
//! - Tokenization for per-member word clouds
//! - A [`Session`] registry and chart payloads for an external renderer
//!
//! ## Example
//!
//! ```rust
//! use chatgraph_core::{ChartOptions, ParsedChat, Session, TimePeriod, ViewConfig};
//!
//! let mut session = Session::new(ViewConfig::chats());
//! session.load(ParsedChat::new("chat.json", vec!["2024-01-05T10:00:00Z".into()]))?;
//!
//! let series = session.series(TimePeriod::Month);
//! assert_eq!(series.labels(), ["Jan 2024".to_string()]);
//!
//! let chart = session.chart(ChartOptions::default());
//! println!("{}", serde_json::to_string(&chart)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chart;
mod config;
mod dashboard;
mod error;
mod record;
mod session;
mod smoothing;
mod sources;
mod timeline;
mod tokenize;

pub use chart::*;
pub use config::*;
pub use dashboard::*;
pub use error::*;
pub use record::*;
pub use session::*;
pub use smoothing::*;
pub use sources::*;
pub use timeline::*;
pub use tokenize::*;
