//! Fuzzy name-to-email resolution against a registrant directory.
//!
//! When an attendance row carries no email, the participant's display
//! name is scored against every registrant using several similarity
//! views (whole name, reversed name, "first last" concatenation, and
//! token overlap). The best view wins per registrant; registrants above
//! the acceptance threshold become candidates.

use serde::{Deserialize, Serialize};

use crate::name::{edit_similarity, normalize_name, reverse_name, token_similarity};

/// Minimum score for a registrant to be considered a candidate.
pub const MATCH_THRESHOLD: f64 = 0.65;

/// Lead over the runner-up required for an unambiguous match.
pub const AMBIGUITY_GAP: f64 = 0.2;

/// Candidates returned for an ambiguous resolution.
const MAX_AMBIGUOUS_CANDIDATES: usize = 3;

/// One entry in the registrant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Registered email address, lowercased.
    pub email: String,
    /// First name as registered.
    pub first_name: String,
    /// Last name as registered.
    pub last_name: String,
    /// Normalized full name, precomputed for scoring.
    pub normalized_full_name: String,
    /// Full name as registered, for display.
    pub original_full_name: String,
}

impl Registrant {
    /// Builds a registrant, deriving the full-name fields.
    #[must_use]
    pub fn new(email: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        let original_full_name = match (first_name.is_empty(), last_name.is_empty()) {
            (false, false) => format!("{first_name} {last_name}"),
            (false, true) => first_name.to_string(),
            (true, _) => last_name.to_string(),
        };
        Self {
            email: email.into().trim().to_lowercase(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            normalized_full_name: normalize_name(&original_full_name),
            original_full_name,
        }
    }
}

/// A scored registrant candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// The candidate's registered email.
    pub email: String,
    /// The candidate's registered full name, for display.
    pub display_name: String,
    /// Similarity score in \[0.0, 1.0\].
    pub score: f64,
    /// The score as an integer percentage.
    pub confidence_percent: u8,
}

impl MatchCandidate {
    fn new(registrant: &Registrant, score: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "score is within [0, 1] so the rounded percent fits in u8"
        )]
        let confidence_percent = (score * 100.0).round() as u8;
        Self {
            email: registrant.email.clone(),
            display_name: registrant.original_full_name.clone(),
            score,
            confidence_percent,
        }
    }
}

/// How a participant's email was determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "email_status", rename_all = "snake_case")]
pub enum EmailResolution {
    /// Email was supplied directly in the attendance log.
    Direct {
        /// The supplied email; may be empty when the log had none and
        /// no directory was available for resolution.
        email: String,
    },
    /// Exactly one registrant matched with a clear lead.
    Matched {
        /// The winning candidate.
        candidate: MatchCandidate,
    },
    /// Multiple registrants scored too close to choose automatically.
    Ambiguous {
        /// Top candidates, best first, at most three.
        candidates: Vec<MatchCandidate>,
    },
    /// No registrant reached the acceptance threshold.
    NotFound,
}

impl EmailResolution {
    /// The resolved email, or the best guess for ambiguous matches.
    /// Empty when nothing was resolved.
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Direct { email } => email,
            Self::Matched { candidate } => &candidate.email,
            Self::Ambiguous { candidates } => {
                candidates.first().map_or("", |c| c.email.as_str())
            }
            Self::NotFound => "",
        }
    }

    /// Status label used in reports and exports.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "direct",
            Self::Matched { .. } => "matched",
            Self::Ambiguous { .. } => "ambiguous",
            Self::NotFound => "not_found",
        }
    }

    /// Candidates produced by the resolver, empty for direct emails.
    #[must_use]
    pub fn candidates(&self) -> &[MatchCandidate] {
        match self {
            Self::Matched { candidate } => std::slice::from_ref(candidate),
            Self::Ambiguous { candidates } => candidates,
            Self::Direct { .. } | Self::NotFound => &[],
        }
    }
}

/// Resolves a participant's email by fuzzy name matching.
///
/// The participant name is normalized and scored against every
/// registrant; the maximum over the four similarity views is the
/// registrant's score. Registrants scoring at or above `threshold`
/// survive, sorted best first:
///
/// - no survivors yields [`EmailResolution::NotFound`];
/// - a top score leading the runner-up by at least [`AMBIGUITY_GAP`]
///   yields [`EmailResolution::Matched`];
/// - anything closer yields [`EmailResolution::Ambiguous`] with up to
///   three candidates.
#[must_use]
pub fn find_email(
    participant_name: &str,
    registrants: &[Registrant],
    threshold: f64,
) -> EmailResolution {
    let normalized = normalize_name(participant_name);
    if normalized.is_empty() || registrants.is_empty() {
        return EmailResolution::NotFound;
    }

    let mut candidates: Vec<MatchCandidate> = registrants
        .iter()
        .filter_map(|registrant| {
            let score = score_registrant(&normalized, registrant);
            (score >= threshold).then(|| MatchCandidate::new(registrant, score))
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let Some(top) = candidates.first() else {
        return EmailResolution::NotFound;
    };

    let unambiguous = candidates
        .get(1)
        .is_none_or(|second| top.score - second.score >= AMBIGUITY_GAP);

    if unambiguous {
        EmailResolution::Matched {
            candidate: candidates.swap_remove(0),
        }
    } else {
        candidates.truncate(MAX_AMBIGUOUS_CANDIDATES);
        EmailResolution::Ambiguous { candidates }
    }
}

/// Scores one registrant against a normalized participant name.
///
/// Takes the maximum of whole-name similarity, reversed-name
/// similarity ("last first" ordering), "first last" concatenation
/// similarity, and token similarity.
fn score_registrant(normalized_participant: &str, registrant: &Registrant) -> f64 {
    let full = &registrant.normalized_full_name;
    let reversed = reverse_name(full);
    let first_last = normalize_name(&format!(
        "{} {}",
        registrant.first_name, registrant.last_name
    ));

    let full_score = edit_similarity(normalized_participant, full);
    let reversed_score = edit_similarity(normalized_participant, &reversed);
    let first_last_score = edit_similarity(normalized_participant, &first_last);
    let token_score = token_similarity(normalized_participant, full);

    full_score
        .max(reversed_score)
        .max(first_last_score)
        .max(token_score)
}
