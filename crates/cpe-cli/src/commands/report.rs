//! Implementation of the `cpe report` command.
//!
//! Runs the full pipeline: parse the attendance, poll, and registrant
//! exports, aggregate and clamp durations, assemble per-participant
//! verdicts, and render a table (or JSON) plus an optional export CSV.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Serialize;

use cpe_core::{
    AttendanceEntry, Increment, ParticipantResult, PollEngagement, Registrant, SessionWindow,
    Summary, aggregate, assemble, clamp_to_session, summarize,
};

use crate::parse::{parse_attendance, parse_poll_report, parse_registrants};

/// Inputs and options for one report run.
#[derive(Debug)]
pub struct ReportOptions {
    /// Attendance CSV paths, merged before aggregation.
    pub attendance: Vec<PathBuf>,
    /// Poll report CSV paths, answers unioned per participant.
    pub polls: Vec<PathBuf>,
    /// Registrant directory CSV paths, concatenated.
    pub registrants: Vec<PathBuf>,
    /// Session window for clamping, if both bounds were supplied.
    pub session: Option<SessionWindow>,
    /// Credit rounding increment.
    pub increment: Increment,
    /// Emit JSON instead of the human-readable table.
    pub json: bool,
    /// Also write the export CSV here.
    pub output: Option<PathBuf>,
}

/// Complete output of one run, shaped for JSON emission.
#[derive(Debug, Serialize)]
struct Report {
    summary: Summary,
    results: Vec<ParticipantResult>,
}

/// Run the report command.
pub fn run(options: &ReportOptions) -> Result<()> {
    let entries = load_attendance(&options.attendance)?;
    tracing::debug!(rows = entries.len(), "loaded attendance entries");

    let participants = aggregate(entries);
    tracing::debug!(participants = participants.len(), "aggregated participants");

    if options.session.is_none() {
        tracing::debug!("no session window configured, skipping clamping");
    }
    let participants = clamp_to_session(participants, options.session);

    let engagement = load_poll_engagement(&options.polls)?;
    let registrants = load_registrants(&options.registrants)?;

    let results = assemble(
        &participants,
        &engagement,
        &registrants,
        options.increment,
    );
    let summary = summarize(&results);

    if let Some(path) = &options.output {
        write_export_csv(path, &results)
            .with_context(|| format!("failed to write export CSV: {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = results.len(), "wrote export CSV");
    }

    let report = Report { summary, results };
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}

/// Parses a session window from `HH:MM` bounds.
///
/// Returns `None` (clamping skipped) unless both bounds are present and
/// parseable; a malformed bound is logged and degrades the same way.
#[must_use]
pub fn parse_session_window(start: Option<&str>, end: Option<&str>) -> Option<SessionWindow> {
    let (Some(start), Some(end)) = (start, end) else {
        return None;
    };

    let parse = |raw: &str| match NaiveTime::parse_from_str(raw.trim(), "%H:%M") {
        Ok(time) => Some(time),
        Err(error) => {
            tracing::warn!(%raw, %error, "unparseable session time, clamping disabled");
            None
        }
    };

    Some(SessionWindow {
        start: parse(start)?,
        end: parse(end)?,
    })
}

fn load_attendance(paths: &[PathBuf]) -> Result<Vec<AttendanceEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read attendance file: {}", path.display()))?;
        let parsed = parse_attendance(&text)
            .with_context(|| format!("failed to parse attendance file: {}", path.display()))?;
        entries.extend(parsed);
    }
    Ok(entries)
}

/// Merges poll reports into one engagement map, unioning each
/// participant's distinct poll titles across files.
fn load_poll_engagement(paths: &[PathBuf]) -> Result<PollEngagement> {
    let mut answered: HashMap<String, Vec<String>> = HashMap::new();

    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read poll report: {}", path.display()))?;
        let report = parse_poll_report(&text)
            .with_context(|| format!("failed to parse poll report: {}", path.display()))?;

        for participant in report.participants {
            let polls = answered.entry(participant.name).or_default();
            for poll in participant.polls {
                if !polls.contains(&poll) {
                    polls.push(poll);
                }
            }
        }
    }

    Ok(answered
        .into_iter()
        .map(|(name, polls)| (name, u32::try_from(polls.len()).unwrap_or(u32::MAX)))
        .collect())
}

fn load_registrants(paths: &[PathBuf]) -> Result<Vec<Registrant>> {
    let mut registrants = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read registrant file: {}", path.display()))?;
        let parsed = parse_registrants(&text)
            .with_context(|| format!("failed to parse registrant file: {}", path.display()))?;
        registrants.extend(parsed);
    }
    Ok(registrants)
}

// ========== Output Formatting ==========

fn format_report(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<28} {:<30} {:<10} {:>5} {:>4} {:>8}  {}",
        "NAME", "EMAIL", "RESOLVED", "MIN", "Q", "CREDITS", "STATUS"
    );

    for result in &report.results {
        let email = if result.email().is_empty() {
            "-"
        } else {
            result.email()
        };
        let _ = writeln!(
            out,
            "{:<28} {:<30} {:<10} {:>5} {:>4} {:>8}  {}",
            truncate(&result.name, 28),
            truncate(email, 30),
            result.resolution.status(),
            result.duration_minutes,
            result.questions_answered,
            result.credits.to_string(),
            result.status,
        );

        // Surface the choices an organizer has to make by hand.
        if result.resolution.status() == "ambiguous" {
            for candidate in result.resolution.candidates() {
                let _ = writeln!(
                    out,
                    "{:<28}   ? {} <{}> ({}%)",
                    "", candidate.display_name, candidate.email, candidate.confidence_percent
                );
            }
        }
    }

    let s = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Participants: {}   Qualified: {} ({:.2}%)   Not qualified: {} ({:.2}%)   Credits awarded: {}",
        s.total, s.qualified, s.qualified_percent, s.not_qualified, s.not_qualified_percent, s.total_credits
    );

    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Writes the export CSV: one row per participant with credits to one
/// decimal place. The csv writer applies RFC 4180 quoting, so embedded
/// commas, quotes, and newlines survive spreadsheet round-trips.
fn write_export_csv(path: &Path, results: &[ParticipantResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "Name",
        "Email",
        "Duration (Minutes)",
        "Questions Answered",
        "Credits Earned",
        "Status",
    ])?;

    for result in results {
        writer.write_record([
            result.name.as_str(),
            result.email(),
            &result.duration_minutes.to_string(),
            &result.questions_answered.to_string(),
            &result.credits.to_string(),
            result.status.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
