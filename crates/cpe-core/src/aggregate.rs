//! Attendance aggregation and session clamping.
//!
//! Raw attendance logs often contain several rows for one person (drops
//! and rejoins, multiple devices). Aggregation merges rows that share a
//! normalized name into one participant, summing durations. Clamping
//! then re-derives each participant's total from the overlap between
//! their join/leave times and the configured session window.

use std::collections::HashMap;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One raw attendance log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// Grouping key derived via [`crate::name::normalize_name`].
    pub normalized_name: String,
    /// The display name exactly as it appeared in the log.
    pub original_name: String,
    /// Email supplied directly in the log, if any.
    pub email: Option<String>,
    /// Raw join timestamp text; parsed lazily during clamping.
    pub join_time: Option<String>,
    /// Raw leave timestamp text; parsed lazily during clamping.
    pub leave_time: Option<String>,
    /// Reported attendance duration in minutes.
    pub duration_minutes: u32,
}

/// All attendance rows for one unique participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedParticipant {
    /// Grouping key shared by all merged entries.
    pub normalized_name: String,
    /// Display name from the first entry seen for this key.
    pub original_name: String,
    /// First non-empty email seen across the merged entries.
    pub email: Option<String>,
    /// Sum of entry durations, or the clamped total after
    /// [`clamp_to_session`].
    pub total_duration_minutes: u32,
    /// The merged entries in input order, retained for clamping.
    pub entries: Vec<AttendanceEntry>,
}

/// A session time-of-day window used for clamping.
///
/// Only hours and minutes are compared; dates are ignored, so a session
/// that spans midnight will clamp incorrectly. That limitation is
/// inherited from the attendance log format, which reports local
/// wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Session start time of day.
    pub start: NaiveTime,
    /// Session end time of day.
    pub end: NaiveTime,
}

impl SessionWindow {
    /// Start of the window in minutes since midnight.
    #[must_use]
    pub fn start_minutes(&self) -> u32 {
        self.start.hour() * 60 + self.start.minute()
    }

    /// End of the window in minutes since midnight.
    #[must_use]
    pub fn end_minutes(&self) -> u32 {
        self.end.hour() * 60 + self.end.minute()
    }
}

/// Groups attendance entries by normalized name.
///
/// Output order is the first-seen order of each key. Durations are
/// summed and the first non-empty email in input order wins.
#[must_use]
pub fn aggregate(entries: Vec<AttendanceEntry>) -> Vec<AggregatedParticipant> {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut participants: Vec<AggregatedParticipant> = Vec::new();

    for entry in entries {
        let index = match by_key.get(&entry.normalized_name) {
            Some(&index) => index,
            None => {
                by_key.insert(entry.normalized_name.clone(), participants.len());
                participants.push(AggregatedParticipant {
                    normalized_name: entry.normalized_name.clone(),
                    original_name: entry.original_name.clone(),
                    email: None,
                    total_duration_minutes: 0,
                    entries: Vec::new(),
                });
                participants.len() - 1
            }
        };

        let participant = &mut participants[index];
        participant.total_duration_minutes = participant
            .total_duration_minutes
            .saturating_add(entry.duration_minutes);
        if participant.email.is_none() {
            participant.email = entry.email.clone().filter(|e| !e.is_empty());
        }
        participant.entries.push(entry);
    }

    participants
}

/// Restricts each participant's counted time to the session window.
///
/// For every retained entry whose join and leave timestamps both parse,
/// the contribution is the overlap of `[join, leave]` with the window,
/// measured in minutes since midnight. Entries with unparseable
/// timestamps fail open and contribute their reported duration
/// unchanged. With no window configured, participants pass through
/// untouched.
#[must_use]
pub fn clamp_to_session(
    participants: Vec<AggregatedParticipant>,
    window: Option<SessionWindow>,
) -> Vec<AggregatedParticipant> {
    let Some(window) = window else {
        return participants;
    };

    let session_start = window.start_minutes();
    let session_end = window.end_minutes();

    participants
        .into_iter()
        .map(|mut participant| {
            let mut clamped_total: u32 = 0;

            for entry in &participant.entries {
                let join = entry.join_time.as_deref().and_then(parse_clock_minutes);
                let leave = entry.leave_time.as_deref().and_then(parse_clock_minutes);

                let contribution = match (join, leave) {
                    (Some(join), Some(leave)) => {
                        let clamped_join = join.max(session_start);
                        let clamped_leave = leave.min(session_end);
                        clamped_leave.saturating_sub(clamped_join)
                    }
                    _ => {
                        // Fail open: keep the reported duration when we
                        // cannot locate the entry on the clock.
                        tracing::debug!(
                            participant = %participant.normalized_name,
                            "unparseable join/leave timestamps, using reported duration"
                        );
                        entry.duration_minutes
                    }
                };

                clamped_total = clamped_total.saturating_add(contribution);
            }

            participant.total_duration_minutes = clamped_total;
            participant
        })
        .collect()
}

/// Timestamp layouts observed across meeting-platform exports.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a timestamp string to minutes since midnight.
///
/// The date component is discarded. Returns `None` when no known layout
/// matches.
fn parse_clock_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.hour() * 60 + parsed.minute());
        }
    }

    // Bare time of day, seen in some trimmed exports.
    for format in &["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"] {
        if let Ok(parsed) = NaiveTime::parse_from_str(raw, format) {
            return Some(parsed.hour() * 60 + parsed.minute());
        }
    }

    None
}
