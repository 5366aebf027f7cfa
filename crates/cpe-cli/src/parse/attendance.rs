//! Attendance CSV parsing.

use cpe_core::{AttendanceEntry, normalize_name};

use super::{ParseError, field, find_column, parse_duration_minutes};

const NAME_ALIASES: &[&str] = &["name", "user name", "name (original name)", "participant"];
const EMAIL_ALIASES: &[&str] = &["email", "email address", "user email"];
const JOIN_ALIASES: &[&str] = &["join time", "join", "time joined"];
const LEAVE_ALIASES: &[&str] = &["leave time", "leave", "time left"];
const DURATION_ALIASES: &[&str] = &[
    "duration",
    "duration (minutes)",
    "duration(minutes)",
    "time in session",
];

/// Parses an attendance export into raw entries.
///
/// Requires a recognizable name column. Rows with an empty name are
/// skipped with a warning; every other field degrades to a default.
pub fn parse_attendance(csv_text: &str) -> Result<Vec<AttendanceEntry>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let name_col = find_column(&headers, NAME_ALIASES).ok_or_else(|| ParseError::MissingColumn {
        kind: "name",
        header: headers.iter().collect::<Vec<_>>().join(","),
    })?;
    let email_col = find_column(&headers, EMAIL_ALIASES);
    let join_col = find_column(&headers, JOIN_ALIASES);
    let leave_col = find_column(&headers, LEAVE_ALIASES);
    let duration_col = find_column(&headers, DURATION_ALIASES);

    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;

        let Some(name) = field(&record, Some(name_col)) else {
            // +2: one for the header row, one for zero-based indexing.
            tracing::warn!(row = index + 2, "attendance row missing name, skipping");
            continue;
        };

        entries.push(AttendanceEntry {
            normalized_name: normalize_name(name),
            original_name: name.to_string(),
            email: field(&record, email_col).map(String::from),
            join_time: field(&record, join_col).map(String::from),
            leave_time: field(&record, leave_col).map(String::from),
            duration_minutes: parse_duration_minutes(field(&record, duration_col)),
        });
    }

    Ok(entries)
}
