// src/web/handlers/match_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::Database;
use crate::matching::{MatchRequest, MatchResult, MatchScorer};
use crate::models::Role;
use crate::services::{Recommendation, RecommendationService};
use crate::web::handlers::{auth_error, service_error};
use crate::web::types::{api_error, ApiError, DataResponse, StandardRequest, WithConversationId};

pub async fn recommended_mentors_handler(
    limit: Option<usize>,
    role: Option<String>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    scorer: &State<MatchScorer>,
) -> Result<Json<DataResponse<Vec<Recommendation>>>, ApiError> {
    let me = auth.require_profile().map_err(|e| auth_error(e, None))?;

    let roles = match parse_roles(role.as_deref()) {
        Ok(roles) => roles,
        Err(e) => {
            return Err(api_error(
                Status::BadRequest,
                e.to_string(),
                "INVALID_ROLE",
                &["Use role=alumni, role=faculty or role=student, comma separated"],
                None,
            ))
        }
    };

    let recommendations = RecommendationService::new(db, scorer)
        .recommend_mentors(&me.id, &roles, limit)
        .await
        .map_err(|e| service_error(e, None))?;

    Ok(Json(DataResponse::success(
        format!("{} recommended mentors", recommendations.len()),
        recommendations,
        None,
    )))
}

/// Score an arbitrary requester/candidates payload without touching storage
pub async fn score_handler(
    request: Json<StandardRequest<MatchRequest>>,
    auth: AuthenticatedUser,
    scorer: &State<MatchScorer>,
) -> Result<Json<DataResponse<Vec<MatchResult>>>, ApiError> {
    let conversation_id = request.conversation_id();

    let results = scorer
        .evaluate(&request.data)
        .map_err(|e| service_error(e.into(), conversation_id.clone()))?;

    info!(
        "User {} scored {} candidates",
        auth.email(),
        results.len()
    );

    Ok(Json(DataResponse::success(
        format!("Scored {} candidates", results.len()),
        results,
        conversation_id,
    )))
}

/// Parse `role=alumni,faculty`; empty or absent means the default mentor roles
pub fn parse_roles(raw: Option<&str>) -> anyhow::Result<Vec<Role>> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert!(parse_roles(None).unwrap().is_empty());
        assert!(parse_roles(Some(" ")).unwrap().is_empty());
        assert_eq!(
            parse_roles(Some("alumni, Faculty")).unwrap(),
            vec![Role::Alumni, Role::Faculty]
        );
        assert!(parse_roles(Some("alumni,dean")).is_err());
    }
}
