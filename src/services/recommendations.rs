// src/services/recommendations.rs
use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::database::Database;
use crate::matching::{MatchResult, MatchScorer};
use crate::models::{Profile, Role};
use crate::services::connections::ConnectionError;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// A ranked match joined with the candidate's public profile
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub profile: Profile,
    #[serde(flatten)]
    pub result: MatchResult,
}

pub struct RecommendationService<'a> {
    db: &'a Database,
    scorer: &'a MatchScorer,
}

impl<'a> RecommendationService<'a> {
    pub fn new(db: &'a Database, scorer: &'a MatchScorer) -> Self {
        Self { db, scorer }
    }

    /// Rank mentor candidates for `requester_id`.
    ///
    /// Candidates are profiles with one of `roles` (alumni and faculty when
    /// empty), minus the requester and anyone already related to them in any
    /// status. `limit` defaults to [`DEFAULT_LIMIT`] and is capped at
    /// [`MAX_LIMIT`].
    pub async fn recommend_mentors(
        &self,
        requester_id: &str,
        roles: &[Role],
        limit: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let requester = self
            .db
            .profiles()
            .find_by_id(requester_id)
            .await?
            .ok_or_else(|| ConnectionError::UnknownProfile(requester_id.to_string()))?;

        let roles = if roles.is_empty() {
            &Role::MENTORS[..]
        } else {
            roles
        };

        let related = self
            .db
            .relationships()
            .related_profile_ids(requester_id)
            .await?;

        let candidates: Vec<Profile> = self
            .db
            .profiles()
            .list_by_roles(roles)
            .await?
            .into_iter()
            .filter(|p| p.id != requester.id && !related.contains(&p.id))
            .collect();

        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let ranked = self.scorer.top(&requester, &candidates, limit);

        info!(
            "Ranked {} of {} mentor candidates for {}",
            ranked.len(),
            candidates.len(),
            requester_id
        );

        Ok(join_profiles(ranked, candidates))
    }
}

fn join_profiles(ranked: Vec<MatchResult>, candidates: Vec<Profile>) -> Vec<Recommendation> {
    let mut by_id: std::collections::HashMap<String, Profile> = candidates
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    ranked
        .into_iter()
        .filter_map(|result| {
            by_id
                .remove(&result.candidate_id)
                .map(|profile| Recommendation { profile, result })
        })
        .collect()
}
