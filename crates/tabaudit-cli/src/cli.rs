//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tabaudit: audit tabular data files
#[derive(Parser)]
#[command(name = "tabaudit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a data file and save the annotated copy and summary report
    Audit {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output directory for audit artifacts (default: audit_files)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Row indices to mark as excluded, comma-separated (e.g. 3,17,42)
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<usize>,

        /// Delimiter character (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Maximum rows to read
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Print per-column summaries without writing artifacts
    Report {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Delimiter character (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
