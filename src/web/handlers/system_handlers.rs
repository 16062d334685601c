// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::auth::OptionalAuth;
use crate::database::Database;
use crate::web::types::{api_error, ApiError, TextResponse};

pub async fn health_handler(
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<TextResponse>, ApiError> {
    match &auth.user {
        Some(user) => info!("Health check by authenticated user: {}", user.email()),
        None => info!("Health check by anonymous user"),
    }

    if let Err(e) = db.health_check().await {
        error!("Health check failed: {}", e);
        return Err(api_error(
            Status::ServiceUnavailable,
            "Database unavailable",
            "DATABASE_ERROR",
            &["Try again in a few moments"],
            None,
        ));
    }

    Ok(Json(TextResponse::success("OK".to_string(), None)))
}
