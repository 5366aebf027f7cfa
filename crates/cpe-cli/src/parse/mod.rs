//! CSV intake for attendance, poll-report, and registrant exports.
//!
//! Meeting platforms are loose about column naming ("Name", "User Name",
//! "Name (Original Name)" all mean the same thing), so column lookup is
//! a case-insensitive containment match against a list of known
//! aliases. Values are trimmed; rows missing required fields are
//! skipped with a warning rather than failing the whole file.

mod attendance;
mod polls;
mod registrants;

pub use attendance::parse_attendance;
pub use polls::{PollParticipant, PollReport, parse_poll_report};
pub use registrants::parse_registrants;

use csv::StringRecord;
use thiserror::Error;

/// Errors from CSV intake.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The CSV reader itself failed.
    #[error("failed to read CSV")]
    Csv(#[from] csv::Error),

    /// A required column could not be located in the header row.
    #[error("no {kind} column found (header: {header})")]
    MissingColumn {
        /// What the column was expected to hold.
        kind: &'static str,
        /// The header row as read, for diagnostics.
        header: String,
    },
}

/// Finds the index of the first header containing any of the aliases,
/// case-insensitively.
fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_lowercase();
        aliases.iter().any(|alias| normalized.contains(alias))
    })
}

/// Returns the trimmed field at `index`, or `None` when absent or empty.
fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    let value = record.get(index?)?.trim();
    (!value.is_empty()).then_some(value)
}

/// Parses a duration cell into whole minutes.
///
/// Accepts a bare integer or takes the first run of digits from noisier
/// values like "95 mins". Anything else counts as zero.
fn parse_duration_minutes(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else { return 0 };

    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    digits.parse().unwrap_or(0)
}

/// Whether a cell is a bare non-negative integer.
fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
