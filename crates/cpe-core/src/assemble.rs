//! Per-participant result assembly and run summary.
//!
//! Ties the pieces together: for each aggregated participant, look up
//! poll engagement, compute potential and actual credits, resolve the
//! email when the log did not supply one, and emit an immutable result
//! row. Participants are independent of each other, so the loop runs on
//! the rayon thread pool; output order still follows aggregation order.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedParticipant;
use crate::credit::{
    Credits, Increment, QualStatus, actual_credits, eligibility, potential_credits,
    required_questions,
};
use crate::matcher::{EmailResolution, MATCH_THRESHOLD, Registrant, find_email};

/// Distinct polls answered, keyed by normalized participant name.
pub type PollEngagement = HashMap<String, u32>;

/// Terminal per-participant verdict. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantResult {
    /// Display name from the attendance log.
    pub name: String,
    /// Normalized grouping key.
    pub normalized_name: String,
    /// How the email was determined, with any match candidates.
    #[serde(flatten)]
    pub resolution: EmailResolution,
    /// Counted attendance minutes (post-clamping).
    pub duration_minutes: u32,
    /// Credits earned after engagement adjustment.
    pub credits: Credits,
    /// Credits earnable from duration alone.
    pub potential_credits: Credits,
    /// Distinct polls the participant answered.
    pub questions_answered: u32,
    /// Questions required at the earned credit level.
    pub required_questions: u32,
    /// Questions that would have been required at the potential level.
    pub required_questions_potential: u32,
    /// Whether the participant qualified for credit.
    pub eligible: bool,
    /// Qualification status.
    pub status: QualStatus,
    /// Reason for disqualification, `None` when eligible.
    pub reason: Option<&'static str>,
}

impl ParticipantResult {
    /// The resolved email, empty if none was found.
    #[must_use]
    pub fn email(&self) -> &str {
        self.resolution.email()
    }
}

/// Aggregate statistics over one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total participants in the run.
    pub total: usize,
    /// Participants who qualified.
    pub qualified: usize,
    /// Participants who did not qualify.
    pub not_qualified: usize,
    /// Qualified share as a percentage of the total.
    pub qualified_percent: f64,
    /// Not-qualified share as a percentage of the total.
    pub not_qualified_percent: f64,
    /// Sum of earned credits across qualified participants.
    pub total_credits: Credits,
}

/// Computes results for every aggregated participant.
///
/// Poll engagement defaults to zero for participants absent from the
/// map. Email resolution runs only when the log supplied no email and a
/// registrant directory is present; otherwise the row keeps its direct
/// email (possibly empty). Output order matches input order.
#[must_use]
pub fn assemble(
    participants: &[AggregatedParticipant],
    polls: &PollEngagement,
    registrants: &[Registrant],
    increment: Increment,
) -> Vec<ParticipantResult> {
    participants
        .par_iter()
        .map(|participant| assemble_one(participant, polls, registrants, increment))
        .collect()
}

fn assemble_one(
    participant: &AggregatedParticipant,
    polls: &PollEngagement,
    registrants: &[Registrant],
    increment: Increment,
) -> ParticipantResult {
    let duration = participant.total_duration_minutes;
    let questions_answered = polls
        .get(&participant.normalized_name)
        .copied()
        .unwrap_or(0);

    let potential = potential_credits(duration, increment);
    let actual = actual_credits(duration, questions_answered, increment);

    let resolution = match &participant.email {
        Some(email) if !email.is_empty() => EmailResolution::Direct {
            email: email.clone(),
        },
        _ if !registrants.is_empty() => {
            let resolution = find_email(&participant.original_name, registrants, MATCH_THRESHOLD);
            tracing::debug!(
                participant = %participant.normalized_name,
                status = resolution.status(),
                "resolved email by name matching"
            );
            resolution
        }
        // No email and no directory to search: report as direct-empty,
        // which displays as missing without implying a failed search.
        _ => EmailResolution::Direct {
            email: String::new(),
        },
    };

    let verdict = eligibility(actual, duration);

    ParticipantResult {
        name: participant.original_name.clone(),
        normalized_name: participant.normalized_name.clone(),
        resolution,
        duration_minutes: duration,
        credits: actual,
        potential_credits: potential,
        questions_answered,
        required_questions: required_questions(actual),
        required_questions_potential: required_questions(potential),
        eligible: verdict.eligible,
        status: verdict.status,
        reason: verdict.reason,
    }
}

/// Derives run statistics from assembled results.
#[must_use]
pub fn summarize(results: &[ParticipantResult]) -> Summary {
    let total = results.len();
    let mut qualified = 0_usize;
    let mut total_credits = Credits::ZERO;

    for result in results {
        if result.eligible {
            qualified += 1;
            total_credits = total_credits.saturating_add(result.credits);
        }
    }

    let not_qualified = total - qualified;
    #[expect(clippy::cast_precision_loss, reason = "participant counts are small")]
    let percent = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    Summary {
        total,
        qualified,
        not_qualified,
        qualified_percent: percent(qualified),
        not_qualified_percent: percent(not_qualified),
        total_credits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AttendanceEntry, aggregate};

    fn participant(name: &str, email: Option<&str>, duration: u32) -> AggregatedParticipant {
        let entries = vec![AttendanceEntry {
            normalized_name: crate::name::normalize_name(name),
            original_name: name.to_string(),
            email: email.map(String::from),
            join_time: None,
            leave_time: None,
            duration_minutes: duration,
        }];
        aggregate(entries).pop().expect("one participant")
    }

    fn polls_for(name: &str, answered: u32) -> PollEngagement {
        let mut polls = PollEngagement::new();
        polls.insert(crate::name::normalize_name(name), answered);
        polls
    }

    // ========== end-to-end scenarios ==========

    #[test]
    fn scenario_full_engagement_qualifies() {
        // 60 minutes, half-credit increment, 3 questions answered:
        // potential 1.0 requires 3, met.
        let participants = vec![participant("Jane Doe", None, 60)];
        let polls = polls_for("Jane Doe", 3);

        let results = assemble(&participants, &polls, &[], Increment::Half);
        let r = &results[0];

        assert_eq!(r.potential_credits, Credits::from_tenths(10));
        assert_eq!(r.required_questions_potential, 3);
        assert_eq!(r.credits, Credits::from_tenths(10));
        assert!(r.eligible);
        assert_eq!(r.status, QualStatus::Qualified);
        assert_eq!(r.reason, None);
    }

    #[test]
    fn scenario_downgrade_below_minimum_disqualifies() {
        // Same participant with only 2 answers: 1.0 requires 3, unmet;
        // step to 0.5 which requires 1, met, but 0.5 is below the 1.0
        // qualifying floor.
        let participants = vec![participant("Jane Doe", None, 60)];
        let polls = polls_for("Jane Doe", 2);

        let results = assemble(&participants, &polls, &[], Increment::Half);
        let r = &results[0];

        assert_eq!(r.credits, Credits::ZERO);
        assert!(!r.eligible);
        assert_eq!(r.status, QualStatus::NotQualified);
        assert_eq!(r.reason, Some("Did not earn minimum 1.0 credits"));
    }

    #[test]
    fn scenario_email_resolved_from_directory() {
        let participants = vec![participant("Jane Doe", None, 60)];
        let polls = polls_for("Jane Doe", 3);
        let registrants = vec![Registrant::new("jane@x.com", "Jane", "Doe")];

        let results = assemble(&participants, &polls, &registrants, Increment::Half);
        let r = &results[0];

        assert_eq!(r.resolution.status(), "matched");
        assert_eq!(r.email(), "jane@x.com");
        assert_eq!(r.resolution.candidates().len(), 1);
        assert_eq!(r.resolution.candidates()[0].confidence_percent, 100);
    }

    // ========== resolution selection ==========

    #[test]
    fn direct_email_skips_resolution() {
        let participants = vec![participant("Jane Doe", Some("direct@x.com"), 60)];
        // A directory entry that would match if consulted.
        let registrants = vec![Registrant::new("jane@x.com", "Jane", "Doe")];

        let results = assemble(&participants, &polls_for("Jane Doe", 3), &registrants, Increment::Half);
        assert_eq!(results[0].resolution.status(), "direct");
        assert_eq!(results[0].email(), "direct@x.com");
    }

    #[test]
    fn missing_email_without_directory_stays_direct_empty() {
        let participants = vec![participant("Jane Doe", None, 60)];

        let results = assemble(&participants, &PollEngagement::new(), &[], Increment::Half);
        assert_eq!(results[0].resolution.status(), "direct");
        assert_eq!(results[0].email(), "");
    }

    #[test]
    fn unknown_participant_defaults_to_zero_questions() {
        let participants = vec![participant("Jane Doe", None, 60)];

        let results = assemble(&participants, &PollEngagement::new(), &[], Increment::Half);
        assert_eq!(results[0].questions_answered, 0);
        assert!(!results[0].eligible);
    }

    // ========== ordering and idempotence ==========

    #[test]
    fn output_order_follows_input_order() {
        let participants = vec![
            participant("Zed Last", None, 60),
            participant("Ann First", None, 60),
            participant("Mid Person", None, 60),
        ];

        let results = assemble(&participants, &PollEngagement::new(), &[], Increment::Half);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Zed Last", "Ann First", "Mid Person"]);
    }

    #[test]
    fn reassembly_is_idempotent() {
        let participants = vec![
            participant("Jane Doe", None, 125),
            participant("Bob Quimby", Some("bob@x.com"), 40),
        ];
        let polls = polls_for("Jane Doe", 7);
        let registrants = vec![Registrant::new("jane@x.com", "Jane", "Doe")];

        let first = assemble(&participants, &polls, &registrants, Increment::Fifth);
        let second = assemble(&participants, &polls, &registrants, Increment::Fifth);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_results() {
        let results = assemble(&[], &PollEngagement::new(), &[], Increment::Half);
        assert!(results.is_empty());
    }

    // ========== summarize ==========

    #[test]
    fn summarize_counts_and_percentages() {
        let participants = vec![
            participant("Jane Doe", None, 60),
            participant("Bob Quimby", None, 60),
            participant("Sam Short", None, 30),
            participant("Pat Quiet", None, 100),
        ];
        let mut polls = PollEngagement::new();
        polls.insert("jane doe".to_string(), 3);
        polls.insert("bob quimby".to_string(), 3);
        // Sam is below the duration floor; Pat answered nothing.

        let results = assemble(&participants, &polls, &[], Increment::Half);
        let summary = summarize(&results);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.qualified, 2);
        assert_eq!(summary.not_qualified, 2);
        assert!((summary.qualified_percent - 50.0).abs() < 1e-9);
        assert!((summary.not_qualified_percent - 50.0).abs() < 1e-9);
        assert_eq!(summary.total_credits, Credits::from_tenths(20));
    }

    #[test]
    fn summarize_empty_results() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!((summary.qualified_percent).abs() < f64::EPSILON);
        assert_eq!(summary.total_credits, Credits::ZERO);
    }
}
