pub mod connection_handlers;
pub mod match_handlers;
pub mod profile_handlers;
pub mod system_handlers;

pub use connection_handlers::*;
pub use match_handlers::*;
pub use profile_handlers::*;
pub use system_handlers::*;

use rocket::http::Status;
use tracing::error;

use crate::auth::AuthError;
use crate::matching::MatchError;
use crate::services::ConnectionError;
use crate::web::types::{api_error, ApiError};

/// Map a service error onto the response envelope.
///
/// Known domain errors keep their code; anything else is logged and
/// reported as an internal error.
pub fn service_error(e: anyhow::Error, conversation_id: Option<String>) -> ApiError {
    if let Some(err) = e.downcast_ref::<ConnectionError>() {
        let status = match err {
            ConnectionError::UnknownProfile(_) | ConnectionError::NotFound => Status::NotFound,
            ConnectionError::NotReceiver => Status::Forbidden,
            ConnectionError::AlreadyExists(_) | ConnectionError::NotPending(_) => Status::Conflict,
            ConnectionError::SelfRequest => Status::BadRequest,
        };
        return api_error(status, err.message(), err.code(), &[], conversation_id);
    }

    if let Some(err) = e.downcast_ref::<MatchError>() {
        return api_error(
            Status::BadRequest,
            err.message(),
            err.code(),
            &["Send both a requester profile and a candidates list"],
            conversation_id,
        );
    }

    error!("Request failed: {:#}", e);
    api_error(
        Status::InternalServerError,
        "Internal server error",
        "INTERNAL_ERROR",
        &["Try again in a few moments"],
        conversation_id,
    )
}

pub fn auth_error(e: AuthError, conversation_id: Option<String>) -> ApiError {
    let status = match e {
        AuthError::ProfileRequired => Status::Forbidden,
        AuthError::DatabaseError => Status::InternalServerError,
        _ => Status::Unauthorized,
    };
    let suggestions: &[&str] = match e {
        AuthError::ProfileRequired => &["Create your profile with PUT /api/profiles/me"],
        _ => &[],
    };
    api_error(status, e.message(), e.code(), suggestions, conversation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelationshipStatus;

    #[test]
    fn test_service_error_codes() {
        let (status, body) = service_error(ConnectionError::NotReceiver.into(), None);
        assert_eq!(status, Status::Forbidden);
        assert_eq!(body.error_code, "NOT_AUTHORIZED");

        let (status, body) = service_error(
            ConnectionError::AlreadyExists(RelationshipStatus::Accepted).into(),
            Some("c1".to_string()),
        );
        assert_eq!(status, Status::Conflict);
        assert_eq!(body.conversation_id.as_deref(), Some("c1"));

        let (status, body) = service_error(MatchError::MissingCandidates.into(), None);
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body.error_code, "INVALID_ARGUMENT");

        let (status, body) = service_error(anyhow::anyhow!("disk on fire"), None);
        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn test_auth_error_status() {
        let (status, body) = auth_error(AuthError::ProfileRequired, None);
        assert_eq!(status, Status::Forbidden);
        assert_eq!(body.error_code, "PROFILE_REQUIRED");
    }
}
