// src/matching/weights.rs
//! Scoring weights and default-year policy for the match scorer.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Upper bound of a match score
pub const MAX_SCORE: u32 = 100;

/// Weight table for the four scored terms.
///
/// `skills + graduation_year + department + interests` must not exceed
/// [`MAX_SCORE`]. The graduation-year term starts at `graduation_year` and
/// loses `year_decay` points per year of difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub skills: u32,
    pub graduation_year: u32,
    pub year_decay: u32,
    pub department: u32,
    pub interests: u32,
    /// Substituted when the requester has no graduation year
    pub default_requester_year: i32,
    /// Substituted when a candidate has no graduation year
    pub default_candidate_year: i32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 40,
            graduation_year: 30,
            year_decay: 2,
            department: 20,
            interests: 10,
            default_requester_year: 2024,
            default_candidate_year: 2020,
        }
    }
}

impl MatchWeights {
    /// Sum of the four component weights, widened so any `u32` inputs fit
    pub fn total(&self) -> u64 {
        [self.skills, self.graduation_year, self.department, self.interests]
            .into_iter()
            .map(u64::from)
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.total() > u64::from(MAX_SCORE) {
            anyhow::bail!(
                "Match weights sum to {} which exceeds the maximum score of {}",
                self.total(),
                MAX_SCORE
            );
        }
        Ok(())
    }
}
