//! CPE credit computation.
//!
//! Credits are earned from verified attendance time and then adjusted
//! downward until the participant's poll engagement satisfies the
//! question requirement for the credit level. All arithmetic is done in
//! integer tenths of a credit so the downgrade search never accumulates
//! floating-point error.
//!
//! The rules, in credit units:
//! - 50 minutes of attendance is worth 1.0 credit, truncated to a
//!   0.2-credit grid, then floored to the configured rounding increment.
//! - Each whole credit requires 3 answered questions; a fractional part
//!   of >= 0.8 adds 2 more, >= 0.4 adds 1 (mutually exclusive, the
//!   higher threshold wins).
//! - 1.0 credit is the absolute qualifying minimum regardless of
//!   increment granularity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Minimum attendance minutes before any credit is possible.
const MIN_DURATION_MINUTES: u32 = 50;

/// Minimum qualifying credit level, in tenths.
const MIN_QUALIFYING_TENTHS: u32 = 10;

/// A credit amount in tenths of a credit.
///
/// `Credits::from_tenths(24)` is 2.4 credits. Exact integer comparison
/// makes the downgrade search in [`actual_credits`] terminate cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(from = "f64")]
pub struct Credits(u32);

impl Credits {
    /// Zero credits.
    pub const ZERO: Self = Self(0);

    /// Creates a credit amount from tenths of a credit.
    #[must_use]
    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    /// Returns the amount in tenths of a credit.
    #[must_use]
    pub const fn tenths(self) -> u32 {
        self.0
    }

    /// Whether this is a zero credit amount.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the amount as a decimal credit value.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Saturating addition, used when summing qualified credits.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Credits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl From<f64> for Credits {
    fn from(value: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "negative and oversized inputs clamp to the representable range"
        )]
        let tenths = (value.max(0.0) * 10.0).round() as u32;
        Self(tenths)
    }
}

/// Error parsing a rounding increment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid rounding increment: {value} (expected 1.0, 0.5, or 0.2)")]
pub struct InvalidIncrement {
    /// The rejected input.
    pub value: String,
}

/// Granularity to which earned credits are snapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Increment {
    /// Whole credits (1.0).
    Whole,
    /// Half credits (0.5).
    #[default]
    Half,
    /// Fifths of a credit (0.2), the finest grid supported.
    Fifth,
}

impl Increment {
    /// The increment step in tenths of a credit.
    #[must_use]
    pub const fn tenths(self) -> u32 {
        match self {
            Self::Whole => 10,
            Self::Half => 5,
            Self::Fifth => 2,
        }
    }

    /// Floors a credit amount to a multiple of this increment.
    #[must_use]
    pub const fn floor(self, credits: Credits) -> Credits {
        let step = self.tenths();
        Credits::from_tenths(credits.tenths() - credits.tenths() % step)
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Whole => "1.0",
            Self::Half => "0.5",
            Self::Fifth => "0.2",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Increment {
    type Err = InvalidIncrement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.0" => Ok(Self::Whole),
            "0.5" | ".5" => Ok(Self::Half),
            "0.2" | ".2" => Ok(Self::Fifth),
            other => Err(InvalidIncrement {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<f64> for Increment {
    type Error = InvalidIncrement;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (value - 1.0).abs() < 1e-9 {
            Ok(Self::Whole)
        } else if (value - 0.5).abs() < 1e-9 {
            Ok(Self::Half)
        } else if (value - 0.2).abs() < 1e-9 {
            Ok(Self::Fifth)
        } else {
            Err(InvalidIncrement {
                value: value.to_string(),
            })
        }
    }
}

impl From<Increment> for f64 {
    fn from(increment: Increment) -> Self {
        match increment {
            Increment::Whole => 1.0,
            Increment::Half => 0.5,
            Increment::Fifth => 0.2,
        }
    }
}

/// Credits earnable from attendance duration alone.
///
/// Below 50 minutes nothing is earned. Otherwise the duration maps onto
/// a 0.2-credit grid (50 minutes = 1.0 credit, truncating) and is then
/// floored to the rounding increment.
#[must_use]
pub fn potential_credits(duration_minutes: u32, increment: Increment) -> Credits {
    if duration_minutes < MIN_DURATION_MINUTES {
        return Credits::ZERO;
    }

    // duration / 50 * 5 truncated, i.e. one 0.2-credit step per full
    // 10 minutes of attendance.
    let base = Credits::from_tenths((duration_minutes / 10) * 2);
    increment.floor(base)
}

/// Poll questions a participant must answer to hold a credit level.
///
/// 3 per whole credit, plus 2 for a fractional part >= 0.8 or 1 for a
/// fractional part >= 0.4. The bonuses do not stack.
#[must_use]
pub const fn required_questions(credits: Credits) -> u32 {
    if credits.is_zero() {
        return 0;
    }

    let whole = credits.tenths() / 10;
    let frac_tenths = credits.tenths() % 10;

    let bonus = if frac_tenths >= 8 {
        2
    } else if frac_tenths >= 4 {
        1
    } else {
        0
    };

    whole * 3 + bonus
}

/// Credits actually earned after engagement adjustment.
///
/// Starts at the potential level and steps down one increment at a time
/// until the participant's answered-question count meets the level's
/// requirement. [`required_questions`] is non-decreasing in the credit
/// level, so the first level that is satisfied is the maximal one.
/// Levels below 1.0 never qualify and collapse to zero.
#[must_use]
pub fn actual_credits(
    duration_minutes: u32,
    questions_answered: u32,
    increment: Increment,
) -> Credits {
    if duration_minutes < MIN_DURATION_MINUTES {
        return Credits::ZERO;
    }

    let mut level = potential_credits(duration_minutes, increment);

    while !level.is_zero() && questions_answered < required_questions(level) {
        level = Credits::from_tenths(level.tenths().saturating_sub(increment.tenths()));
    }

    if level.tenths() < MIN_QUALIFYING_TENTHS {
        return Credits::ZERO;
    }

    level
}

/// Final qualification status for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualStatus {
    /// Earned at least the minimum qualifying credit.
    Qualified,
    /// Did not qualify for any credit.
    NotQualified,
}

impl QualStatus {
    /// Display string used in reports and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qualified => "Qualified",
            Self::NotQualified => "Not Qualified",
        }
    }
}

impl fmt::Display for QualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A qualification verdict with its reason when negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    /// Whether the participant earned credit.
    pub eligible: bool,
    /// Qualification status.
    pub status: QualStatus,
    /// Reason for disqualification, `None` when eligible.
    pub reason: Option<&'static str>,
}

/// Determines eligibility from the final credit amount.
///
/// A participant is eligible iff they earned a non-zero credit amount.
/// The reason distinguishes insufficient attendance from insufficient
/// engagement.
#[must_use]
pub const fn eligibility(actual: Credits, duration_minutes: u32) -> Eligibility {
    if actual.is_zero() {
        let reason = if duration_minutes < MIN_DURATION_MINUTES {
            "Duration < 50 minutes"
        } else {
            "Did not earn minimum 1.0 credits"
        };
        Eligibility {
            eligible: false,
            status: QualStatus::NotQualified,
            reason: Some(reason),
        }
    } else {
        Eligibility {
            eligible: true,
            status: QualStatus::Qualified,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Credits ==========

    #[test]
    fn credits_display_one_decimal() {
        assert_eq!(Credits::from_tenths(24).to_string(), "2.4");
        assert_eq!(Credits::from_tenths(10).to_string(), "1.0");
        assert_eq!(Credits::ZERO.to_string(), "0.0");
    }

    #[test]
    fn credits_serialize_as_decimal() {
        let json = serde_json::to_string(&Credits::from_tenths(15)).unwrap();
        assert_eq!(json, "1.5");
    }

    // ========== Increment ==========

    #[test]
    fn increment_parses_supported_values() {
        assert_eq!("1.0".parse::<Increment>().unwrap(), Increment::Whole);
        assert_eq!("0.5".parse::<Increment>().unwrap(), Increment::Half);
        assert_eq!("0.2".parse::<Increment>().unwrap(), Increment::Fifth);
        assert!("0.25".parse::<Increment>().is_err());
        assert!("".parse::<Increment>().is_err());
    }

    #[test]
    fn increment_floor_snaps_down() {
        let c = Credits::from_tenths(24); // 2.4
        assert_eq!(Increment::Whole.floor(c), Credits::from_tenths(20));
        assert_eq!(Increment::Half.floor(c), Credits::from_tenths(20));
        assert_eq!(Increment::Fifth.floor(c), Credits::from_tenths(24));
    }

    // ========== potential_credits ==========

    #[test]
    fn potential_below_duration_floor_is_zero() {
        assert_eq!(potential_credits(49, Increment::Whole), Credits::ZERO);
        assert_eq!(potential_credits(49, Increment::Half), Credits::ZERO);
        assert_eq!(potential_credits(49, Increment::Fifth), Credits::ZERO);
        assert_eq!(potential_credits(0, Increment::Fifth), Credits::ZERO);
    }

    #[test]
    fn potential_at_exactly_50_minutes() {
        assert_eq!(potential_credits(50, Increment::Fifth), Credits::from_tenths(10));
        assert_eq!(potential_credits(50, Increment::Whole), Credits::from_tenths(10));
    }

    #[test]
    fn potential_60_minutes_half_increment() {
        assert_eq!(potential_credits(60, Increment::Half), Credits::from_tenths(10));
    }

    #[test]
    fn potential_100_minutes_whole_increment() {
        assert_eq!(potential_credits(100, Increment::Whole), Credits::from_tenths(20));
    }

    #[test]
    fn potential_125_minutes_half_increment() {
        // 125 min -> 2.4 on the 0.2 grid -> floored to 2.0 at half-credit
        // granularity.
        assert_eq!(potential_credits(125, Increment::Half), Credits::from_tenths(20));
    }

    #[test]
    fn potential_125_minutes_fifth_increment() {
        assert_eq!(potential_credits(125, Increment::Fifth), Credits::from_tenths(24));
    }

    // ========== required_questions ==========

    #[test]
    fn required_zero_for_zero_credits() {
        assert_eq!(required_questions(Credits::ZERO), 0);
    }

    #[test]
    fn required_whole_credits() {
        assert_eq!(required_questions(Credits::from_tenths(10)), 3);
        assert_eq!(required_questions(Credits::from_tenths(20)), 6);
        assert_eq!(required_questions(Credits::from_tenths(30)), 9);
    }

    #[test]
    fn required_fractional_thresholds() {
        // 2.4 -> 6 + 1 = 7
        assert_eq!(required_questions(Credits::from_tenths(24)), 7);
        // 2.8 -> 6 + 2 = 8 (bonuses do not stack)
        assert_eq!(required_questions(Credits::from_tenths(28)), 8);
        // 2.2 -> 6, below the 0.4 threshold
        assert_eq!(required_questions(Credits::from_tenths(22)), 6);
        // 0.5 -> 0 + 1 = 1
        assert_eq!(required_questions(Credits::from_tenths(5)), 1);
    }

    #[test]
    fn required_is_non_decreasing() {
        let mut prev = 0;
        for tenths in 0..=60 {
            let req = required_questions(Credits::from_tenths(tenths));
            assert!(req >= prev, "requirement decreased at {tenths} tenths");
            prev = req;
        }
    }

    // ========== actual_credits ==========

    #[test]
    fn actual_below_duration_floor_is_zero() {
        assert_eq!(actual_credits(49, 100, Increment::Fifth), Credits::ZERO);
    }

    #[test]
    fn actual_full_engagement_keeps_potential() {
        assert_eq!(
            actual_credits(60, 3, Increment::Half),
            Credits::from_tenths(10)
        );
        assert_eq!(
            actual_credits(125, 7, Increment::Fifth),
            Credits::from_tenths(24)
        );
    }

    #[test]
    fn actual_downgrades_until_requirement_met() {
        // Potential 2.4 requires 7; with 6 answered, step to 2.2 which
        // requires 6.
        assert_eq!(
            actual_credits(125, 6, Increment::Fifth),
            Credits::from_tenths(22)
        );
        // With 3 answered, keep stepping to 1.0 (requires 3).
        assert_eq!(
            actual_credits(125, 3, Increment::Fifth),
            Credits::from_tenths(10)
        );
    }

    #[test]
    fn actual_collapses_below_one_credit() {
        // 60 min at half increment: potential 1.0 requires 3. With 2
        // answered, step down to 0.5 (requires 1, met) but 0.5 is below
        // the qualifying minimum.
        assert_eq!(actual_credits(60, 2, Increment::Half), Credits::ZERO);
    }

    #[test]
    fn actual_zero_questions_zero_credits() {
        assert_eq!(actual_credits(300, 0, Increment::Whole), Credits::ZERO);
    }

    #[test]
    fn actual_monotone_in_questions_answered() {
        for questions in 0..15 {
            let lower = actual_credits(125, questions, Increment::Fifth);
            let higher = actual_credits(125, questions + 1, Increment::Fifth);
            assert!(higher >= lower, "actual credits decreased at {questions} questions");
        }
    }

    // ========== eligibility ==========

    #[test]
    fn eligibility_qualified_when_credits_earned() {
        let e = eligibility(Credits::from_tenths(10), 60);
        assert!(e.eligible);
        assert_eq!(e.status, QualStatus::Qualified);
        assert_eq!(e.reason, None);
    }

    #[test]
    fn eligibility_reason_short_duration() {
        let e = eligibility(Credits::ZERO, 30);
        assert!(!e.eligible);
        assert_eq!(e.status, QualStatus::NotQualified);
        assert_eq!(e.reason, Some("Duration < 50 minutes"));
    }

    #[test]
    fn eligibility_reason_insufficient_engagement() {
        let e = eligibility(Credits::ZERO, 60);
        assert!(!e.eligible);
        assert_eq!(e.reason, Some("Did not earn minimum 1.0 credits"));
    }
}
