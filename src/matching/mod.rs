// src/matching/mod.rs
//! Mentor/mentee match scoring.
//!
//! A score is the sum of four weighted terms (skill overlap, graduation-year
//! proximity, department equality, interest overlap) clamped to
//! `0..=MAX_SCORE`. See [`MatchWeights`] for the default table.

pub mod normalize;
pub mod scorer;
pub mod weights;

pub use scorer::MatchScorer;
pub use weights::{MatchWeights, MAX_SCORE};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Profile;

/// Per-term contributions before rounding
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills: f64,
    pub graduation_year: f64,
    pub department: f64,
    pub interests: f64,
}

impl MatchBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.graduation_year + self.department + self.interests
    }
}

/// Derived, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub score: u32,
    pub matched_skills: Vec<String>,
    pub matched_interests: Vec<String>,
    pub breakdown: MatchBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    MissingRequester,
    MissingCandidates,
}

impl MatchError {
    pub fn message(&self) -> &'static str {
        match self {
            MatchError::MissingRequester => "A requester profile is required",
            MatchError::MissingCandidates => "A candidate list is required",
        }
    }

    pub fn code(&self) -> &'static str {
        "INVALID_ARGUMENT"
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for MatchError {}

/// Loosely-shaped scoring input as it arrives from outside the crate.
///
/// Both fields are optional at the type level so that an absent requester or
/// candidate list is reported as [`MatchError`] instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub requester: Option<Profile>,
    #[serde(default)]
    pub candidates: Option<Vec<Profile>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl MatchScorer {
    /// Validate the request shape, then rank and optionally truncate
    pub fn evaluate(&self, request: &MatchRequest) -> Result<Vec<MatchResult>, MatchError> {
        let requester = request
            .requester
            .as_ref()
            .ok_or(MatchError::MissingRequester)?;
        let candidates = request
            .candidates
            .as_deref()
            .ok_or(MatchError::MissingCandidates)?;

        Ok(match request.limit {
            Some(limit) => self.top(requester, candidates, limit),
            None => self.rank(requester, candidates),
        })
    }
}
