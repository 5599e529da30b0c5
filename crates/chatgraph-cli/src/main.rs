//! chatgraph CLI - Chart message activity in chat and conversation exports.
//!
//! Every subcommand loads one or more export files and prints a derived
//! view: a timeline table or chart payload, the loaded-file list, topic
//! dashboards, or per-member word tables. `--json` switches any of them to
//! machine-readable output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::timeline::TimelineArgs;

#[derive(Parser)]
#[command(name = "chatgraph")]
#[command(author, version, about = "Chart message activity in chat and conversation exports", long_about = None)]
struct Cli {
    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count messages or conversations per day, month, or year
    Timeline(TimelineArgs),

    /// List loaded files with their date range and contents
    Info {
        /// Export files (group/DM chats or conversation arrays)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,
    },

    /// Show per-topic activity of a forum group export
    Topics {
        /// Group chat export
        file: PathBuf,

        /// Number of members to include in each hour heatmap
        #[arg(short, long)]
        members: Option<usize>,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,
    },

    /// Show the most frequent words per member
    Words {
        /// Chat export
        file: PathBuf,

        /// Only show this member
        #[arg(short, long)]
        member: Option<String>,

        /// Maximum number of words per member
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Timeline(args) => commands::timeline::run(&args),
        Commands::Info { files, json } => commands::info::run(&files, json),
        Commands::Topics {
            file,
            members,
            json,
        } => commands::topics::run(&file, members, json),
        Commands::Words {
            file,
            member,
            limit,
            json,
        } => commands::words::run(&file, member.as_deref(), limit, json),
    }
}
