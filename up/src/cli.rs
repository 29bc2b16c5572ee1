//! CLI argument parsing for updateprogress

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "up")]
#[command(author, version, about = "Render course progress into a README region", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the progress region of a document with freshly rendered tables
    Update {
        /// Progress JSON file (default: progress.json)
        #[arg(short, long)]
        progress: Option<PathBuf>,

        /// Document containing the progress markers (default: README.md)
        #[arg(short, long)]
        readme: Option<PathBuf>,

        /// Print the updated document instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the rendered progress region content
    Render {
        /// Progress JSON file (default: progress.json)
        #[arg(short, long)]
        progress: Option<PathBuf>,
    },

    /// Show the course requirement status
    Check {
        /// Progress JSON file (default: progress.json)
        #[arg(short, long)]
        progress: Option<PathBuf>,
    },

    /// Print the begin/end marker lines for a progress id
    Markers {
        /// Progress id (the `progressName` of the progress file)
        #[arg(required = true)]
        id: String,

        /// Section type used in the markers (default: Progress)
        #[arg(short, long)]
        section: Option<String>,
    },
}
