// src/web/handlers/profile_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::Database;
use crate::models::{Profile, ProfileUpdate};
use crate::web::handlers::service_error;
use crate::web::types::{
    api_error, ActionResponse, ApiError, DataResponse, StandardRequest, UserInfo,
    WithConversationId,
};

pub async fn get_current_user_handler(auth: AuthenticatedUser) -> Json<DataResponse<UserInfo>> {
    let user = auth.user();
    let message = match &auth.profile {
        Some(profile) => format!("Signed in as {}", profile.display_name),
        None => "Signed in, no profile yet".to_string(),
    };

    Json(DataResponse::success(
        message,
        UserInfo {
            uid: user.uid.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            profile: auth.profile.clone(),
        },
        None,
    ))
}

/// Create the caller's profile on first call, overwrite it afterwards
pub async fn upsert_my_profile_handler(
    request: Json<StandardRequest<ProfileUpdate>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse<Profile>>, ApiError> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();
    let data = request.data;

    if let Err(reason) = data.validate() {
        return Err(api_error(
            Status::UnprocessableEntity,
            reason.to_string(),
            "INVALID_PROFILE",
            &["Check the profile fields and try again"],
            conversation_id,
        ));
    }

    let profiles = db.profiles();
    let (profile, action) = match &auth.profile {
        Some(existing) => {
            let updated = profiles
                .update(&existing.id, &data)
                .await
                .map_err(|e| service_error(e, conversation_id.clone()))?;
            match updated {
                Some(profile) => (profile, "updated"),
                None => {
                    return Err(api_error(
                        Status::NotFound,
                        "Profile disappeared during update",
                        "PROFILE_NOT_FOUND",
                        &["Try again"],
                        conversation_id,
                    ))
                }
            }
        }
        None => {
            let profile = profiles
                .create(Some(auth.uid()), &data)
                .await
                .map_err(|e| service_error(e, conversation_id.clone()))?;
            (profile, "created")
        }
    };

    info!(
        "User {} {} profile {}",
        auth.email(),
        action,
        profile.id
    );

    Ok(Json(
        ActionResponse::success(
            format!("Profile '{}' {}", profile.display_name, action),
            action.to_string(),
            conversation_id,
        )
        .with_data(profile),
    ))
}

pub async fn get_profile_handler(
    id: String,
    _auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    match db.profiles().find_by_id(&id).await {
        Ok(Some(profile)) => Ok(Json(DataResponse::success(
            format!("Profile {}", profile.display_name),
            profile,
            None,
        ))),
        Ok(None) => Err(api_error(
            Status::NotFound,
            format!("Profile '{}' not found", id),
            "PROFILE_NOT_FOUND",
            &["Check the profile id"],
            None,
        )),
        Err(e) => Err(service_error(e, None)),
    }
}
