//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Analyze typing logs from a hold-to-remap keyboard tool
#[derive(Debug, Parser)]
#[command(name = "typing-log-analyzer", version, about)]
pub struct Cli {
    /// Typing log to analyze (JSON Lines)
    pub log_file: Option<PathBuf>,

    /// Analyze every typing-log-*.jsonl in the log directory
    #[arg(long, conflicts_with = "log_file")]
    pub all: bool,

    /// Log directory used with --all
    #[arg(long, value_name = "DIR", conflicts_with = "log_file")]
    pub log_dir: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Skip chart generation
    #[arg(long)]
    pub no_plots: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Usage text printed when no input is given.
pub const USAGE: &str = "Usage: typing-log-analyzer <log_file.jsonl>\n       typing-log-analyzer --all";

impl Cli {
    /// Whether the user named something to analyze. `--log-dir` alone is not
    /// enough; it only takes effect with `--all`.
    pub fn has_input(&self) -> bool {
        self.all || self.log_file.is_some()
    }
}
