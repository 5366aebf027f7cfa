//! Core domain logic for CPE credit eligibility.
//!
//! This crate contains the fundamental types and logic for:
//! - Aggregation: merging raw attendance rows per participant and
//!   clamping durations to the session window
//! - Credit computation: potential/actual credits and the
//!   required-question rules
//! - Identity resolution: fuzzy name-to-email matching against a
//!   registrant directory
//! - Assembly: producing per-participant verdicts and a run summary

pub mod aggregate;
pub mod assemble;
pub mod credit;
pub mod matcher;
pub mod name;

pub use aggregate::{AggregatedParticipant, AttendanceEntry, SessionWindow, aggregate, clamp_to_session};
pub use assemble::{ParticipantResult, PollEngagement, Summary, assemble, summarize};
pub use credit::{
    Credits, Eligibility, Increment, InvalidIncrement, QualStatus, actual_credits, eligibility,
    potential_credits, required_questions,
};
pub use matcher::{
    EmailResolution, MATCH_THRESHOLD, MatchCandidate, Registrant, find_email,
};
pub use name::{edit_similarity, levenshtein, normalize_name, token_similarity};
