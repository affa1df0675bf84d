//! Vote threshold evaluation for pending videos.
//!
//! A pending video qualifies for publication once its vote count reaches the
//! configured threshold. The store applies the actual promotion; the
//! evaluator here only reports progress. Both sides must be handed the same
//! [`VoteThreshold`], so it is loaded once from `VOTES_TO_PUBLISH` and
//! passed around rather than re-read.

use std::fmt;
use std::num::NonZeroU32;

use serde::Serialize;

/// Threshold used when the configured value is missing or invalid.
pub const DEFAULT_VOTE_THRESHOLD: u32 = 10;

/// Environment variable holding the publish threshold.
pub const VOTE_THRESHOLD_ENV: &str = "VOTES_TO_PUBLISH";

// ---------------------------------------------------------------------------
// VoteThreshold
// ---------------------------------------------------------------------------

/// Number of votes a pending video needs to be published. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VoteThreshold(NonZeroU32);

impl VoteThreshold {
    /// `None` for zero.
    pub fn new(votes: u32) -> Option<Self> {
        NonZeroU32::new(votes).map(Self)
    }

    /// Parse a configured value, falling back to [`DEFAULT_VOTE_THRESHOLD`]
    /// when it is missing, non-numeric, or not positive.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|n| u32::try_from(n).ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    /// Read [`VOTE_THRESHOLD_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::parse_or_default(std::env::var(VOTE_THRESHOLD_ENV).ok().as_deref())
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Evaluate progress for a vote count against this threshold.
    pub fn evaluate(self, votes_count: u32) -> VoteProgress {
        evaluate(votes_count, self)
    }
}

impl Default for VoteThreshold {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(DEFAULT_VOTE_THRESHOLD - 1))
    }
}

impl fmt::Display for VoteThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// User-facing progress of a pending video toward publication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoteProgress {
    pub votes_count: u32,
    pub threshold: u32,
    /// Votes still needed, zero once the threshold is reached.
    pub remaining: u32,
    /// `votes / threshold * 100`, clamped to 100.
    pub progress_percent: f64,
    pub is_ready: bool,
}

impl VoteProgress {
    /// Vote count for an "n/threshold" counter, never above the threshold.
    pub fn displayed_votes(&self) -> u32 {
        self.votes_count.min(self.threshold)
    }
}

/// Compute readiness and progress for `votes_count` votes.
pub fn evaluate(votes_count: u32, threshold: VoteThreshold) -> VoteProgress {
    let threshold = threshold.get();
    let remaining = threshold.saturating_sub(votes_count);
    let progress_percent = (f64::from(votes_count) / f64::from(threshold) * 100.0).min(100.0);

    VoteProgress {
        votes_count,
        threshold,
        remaining,
        progress_percent,
        is_ready: remaining == 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ten() -> VoteThreshold {
        VoteThreshold::new(10).unwrap()
    }

    #[test]
    fn exactly_at_threshold_is_ready() {
        let p = evaluate(10, ten());
        assert_eq!(p.remaining, 0);
        assert!(p.is_ready);
        assert_eq!(p.progress_percent, 100.0);
    }

    #[test]
    fn above_threshold_is_clamped() {
        let p = evaluate(12, ten());
        assert_eq!(p.remaining, 0);
        assert!(p.is_ready);
        assert_eq!(p.progress_percent, 100.0);
        assert_eq!(p.displayed_votes(), 10);
    }

    #[test]
    fn zero_votes_has_no_progress() {
        let p = evaluate(0, ten());
        assert_eq!(p.progress_percent, 0.0);
        assert_eq!(p.remaining, 10);
        assert!(!p.is_ready);
    }

    #[test]
    fn partial_progress() {
        let p = ten().evaluate(3);
        assert_eq!(p.remaining, 7);
        assert!((p.progress_percent - 30.0).abs() < f64::EPSILON);
        assert_eq!(p.displayed_votes(), 3);
    }

    #[test]
    fn default_threshold_is_ten() {
        assert_eq!(VoteThreshold::default().get(), DEFAULT_VOTE_THRESHOLD);
    }

    #[test]
    fn parse_accepts_positive_integers() {
        assert_eq!(VoteThreshold::parse_or_default(Some("25")).get(), 25);
        assert_eq!(VoteThreshold::parse_or_default(Some(" 3 ")).get(), 3);
    }

    #[test]
    fn parse_falls_back_on_invalid_values() {
        for raw in [None, Some(""), Some("abc"), Some("0"), Some("-4"), Some("2.5")] {
            assert_eq!(
                VoteThreshold::parse_or_default(raw).get(),
                DEFAULT_VOTE_THRESHOLD,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn zero_is_not_a_threshold() {
        assert!(VoteThreshold::new(0).is_none());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&ten()).unwrap();
        assert_eq!(json, "10");
    }
}
