// src/matching/scorer.rs
use crate::matching::normalize::{NormalizedProfile, Side};
use crate::matching::{MatchBreakdown, MatchResult, MatchWeights, MAX_SCORE};
use crate::models::Profile;

/// Ranks candidate profiles by compatibility with a requesting profile.
///
/// Stateless apart from its weight table, so one instance can be shared
/// across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: MatchWeights,
}

impl MatchScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    /// Score a single candidate against the requester
    pub fn score(&self, requester: &Profile, candidate: &Profile) -> MatchResult {
        let req = NormalizedProfile::new(requester, Side::Requester, &self.weights);
        self.score_normalized(&req, candidate)
    }

    /// Score every candidate and sort by descending score.
    ///
    /// Candidates with equal scores keep their input order.
    pub fn rank(&self, requester: &Profile, candidates: &[Profile]) -> Vec<MatchResult> {
        let req = NormalizedProfile::new(requester, Side::Requester, &self.weights);

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| self.score_normalized(&req, candidate))
            .collect();

        // sort_by is stable
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }

    /// `rank` truncated to the best `limit` results
    pub fn top(&self, requester: &Profile, candidates: &[Profile], limit: usize) -> Vec<MatchResult> {
        let mut results = self.rank(requester, candidates);
        results.truncate(limit);
        results
    }

    fn score_normalized(&self, req: &NormalizedProfile, candidate: &Profile) -> MatchResult {
        let w = &self.weights;
        let cand = NormalizedProfile::new(candidate, Side::Candidate, w);

        let matched_skills = req.skills.intersection(&cand.skills);
        let matched_interests = req.interests.intersection(&cand.interests);

        let skills = overlap(w.skills, matched_skills.len(), req.skills.len());
        let interests = overlap(w.interests, matched_interests.len(), req.interests.len());

        let year_diff = (i64::from(cand.graduation_year) - i64::from(req.graduation_year)).abs();
        let graduation_year =
            (i64::from(w.graduation_year) - i64::from(w.year_decay).saturating_mul(year_diff)).max(0)
                as f64;

        let department = match (&req.department, &cand.department) {
            (Some(a), Some(b)) if a == b => f64::from(w.department),
            _ => 0.0,
        };

        let breakdown = MatchBreakdown {
            skills,
            graduation_year,
            department,
            interests,
        };

        MatchResult {
            candidate_id: candidate.id.clone(),
            score: clamp_score(breakdown.total()),
            matched_skills,
            matched_interests,
            breakdown,
        }
    }
}

/// `weight * common / max(requester_count, 1)`
fn overlap(weight: u32, common: usize, requester_count: usize) -> f64 {
    f64::from(weight) * common as f64 / requester_count.max(1) as f64
}

fn clamp_score(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u32
}
