//! Poll-report CSV parsing.
//!
//! Poll exports are not plain tables: they interleave an overview block
//! with one section per launched poll. A section starts with a title
//! row (text in the first cell, nothing in the second) followed by a
//! header row whose first cell is `#`; response rows are numbered in
//! the first cell. A blank first cell ends the section.

use std::collections::HashMap;

use cpe_core::normalize_name;

use super::{ParseError, is_numeric};

/// Parsed poll report: the detected polls and per-participant answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Poll titles in the order the sections appeared.
    pub poll_names: Vec<String>,
    /// Per-participant response data, keyed by normalized name.
    pub participants: Vec<PollParticipant>,
}

/// One participant's poll responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParticipant {
    /// Normalized participant name.
    pub name: String,
    /// Titles of the distinct polls this participant answered.
    pub polls: Vec<String>,
}

impl PollParticipant {
    /// Number of distinct polls answered.
    #[must_use]
    pub fn polls_answered(&self) -> u32 {
        u32::try_from(self.polls.len()).unwrap_or(u32::MAX)
    }
}

/// Parses a sectioned poll report.
pub fn parse_poll_report(csv_text: &str) -> Result<PollReport, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let mut poll_names: Vec<String> = Vec::new();
    let mut responses: HashMap<String, Vec<String>> = HashMap::new();
    let mut response_order: Vec<String> = Vec::new();

    let mut current_poll: Option<String> = None;
    let mut header_row: usize = 0;

    for (i, row) in rows.iter().enumerate() {
        let first = row.get(0).unwrap_or("").trim();

        if first == "Launched Polls" {
            continue;
        }

        // A poll title row has text in the first cell, an empty second
        // cell, and is immediately followed by the `#` header row.
        let second_empty = row.len() > 1 && row.get(1).is_some_and(|c| c.trim().is_empty());
        if !first.is_empty()
            && !first.starts_with('#')
            && first != "Overview"
            && !is_numeric(first)
            && second_empty
            && rows
                .get(i + 1)
                .and_then(|next| next.get(0))
                .is_some_and(|cell| cell.trim() == "#")
        {
            poll_names.push(first.to_string());
            current_poll = Some(first.to_string());
            header_row = i + 1;
            continue;
        }

        let Some(poll) = &current_poll else { continue };
        if i <= header_row || row.len() <= 1 {
            continue;
        }

        if is_numeric(first) {
            // Numbered response row; the participant name sits in the
            // second column.
            if let Some(name) = row.get(1).map(str::trim).filter(|n| !n.is_empty()) {
                let key = normalize_name(name);
                if key.is_empty() {
                    continue;
                }
                let polls = responses.entry(key.clone()).or_insert_with(|| {
                    response_order.push(key);
                    Vec::new()
                });
                if !polls.contains(poll) {
                    polls.push(poll.clone());
                }
            }
        } else if first.is_empty() {
            current_poll = None;
        }
    }

    let participants = response_order
        .into_iter()
        .map(|name| {
            let polls = responses.remove(&name).unwrap_or_default();
            PollParticipant { name, polls }
        })
        .collect();

    Ok(PollReport {
        poll_names,
        participants,
    })
}
