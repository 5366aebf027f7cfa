//! Implementation of the `cpe polls` command.
//!
//! Parses a poll report and prints what was detected, as a quick check
//! that a platform export is being read the way the organizer expects.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::parse::{PollReport, parse_poll_report};

/// Run the polls command.
pub fn run(file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read poll report: {}", file.display()))?;
    let report = parse_poll_report(&text).context("failed to parse poll report")?;

    print!("{}", format_poll_report(&report));
    Ok(())
}

fn format_poll_report(report: &PollReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Detected {} poll(s):", report.poll_names.len());
    for name in &report.poll_names {
        let _ = writeln!(out, "  - {name}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Responses ({} participants):", report.participants.len());
    for participant in &report.participants {
        let _ = writeln!(
            out,
            "  {:<30} {} poll(s)",
            participant.name,
            participant.polls_answered()
        );
    }

    out
}
