//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CPE credit eligibility calculator.
///
/// Converts meeting attendance and poll-engagement exports into
/// per-participant continuing-education-credit verdicts, resolving
/// missing emails against an optional registrant directory.
#[derive(Debug, Parser)]
#[command(name = "cpe", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute credit eligibility from attendance and poll exports.
    Report {
        /// Attendance CSV file(s); rows from multiple files are merged
        /// before aggregation.
        #[arg(long, required = true, num_args = 1..)]
        attendance: Vec<PathBuf>,

        /// Poll report CSV file(s); answers are unioned per participant.
        #[arg(long, num_args = 1..)]
        polls: Vec<PathBuf>,

        /// Registrant directory CSV file(s) for email resolution.
        #[arg(long, num_args = 1..)]
        registrants: Vec<PathBuf>,

        /// Session start time of day (HH:MM); enables clamping together
        /// with --session-end.
        #[arg(long)]
        session_start: Option<String>,

        /// Session end time of day (HH:MM).
        #[arg(long)]
        session_end: Option<String>,

        /// Credit rounding increment: 1.0, 0.5, or 0.2.
        #[arg(long)]
        increment: Option<cpe_core::Increment>,

        /// Emit the full result set as JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Also write an export CSV to this path.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Inspect a poll report: list detected polls and response counts.
    Polls {
        /// Poll report CSV file.
        file: PathBuf,
    },
}
