// src/web/handlers/connection_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::Database;
use crate::models::Relationship;
use crate::services::ConnectionService;
use crate::web::handlers::{auth_error, service_error};
use crate::web::types::{
    ActionResponse, ApiError, ConnectionAction, ConnectionInfo, ConnectionRequest, DataResponse,
    RespondRequest, StandardRequest, WithConversationId,
};

pub async fn request_connection_handler(
    request: Json<StandardRequest<ConnectionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse<ConnectionInfo>>, ApiError> {
    let conversation_id = request.conversation_id();
    let me = auth
        .require_profile()
        .map_err(|e| auth_error(e, conversation_id.clone()))?;

    let relationship = ConnectionService::new(db)
        .request_connection(&me.id, &request.data.receiver_id)
        .await
        .map_err(|e| service_error(e, conversation_id.clone()))?;

    info!("{} requested connection with {}", me.id, relationship.receiver_id);

    Ok(Json(
        ActionResponse::success(
            "Connection request sent".to_string(),
            "requested".to_string(),
            conversation_id,
        )
        .with_data(connection_info(relationship, &me.id)),
    ))
}

pub async fn respond_connection_handler(
    id: String,
    request: Json<StandardRequest<RespondRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse<ConnectionInfo>>, ApiError> {
    let conversation_id = request.conversation_id();
    let me = auth
        .require_profile()
        .map_err(|e| auth_error(e, conversation_id.clone()))?;
    let accept = request.data.action == ConnectionAction::Accept;

    let relationship = ConnectionService::new(db)
        .respond(&id, &me.id, accept)
        .await
        .map_err(|e| service_error(e, conversation_id.clone()))?;

    let status = relationship.status;
    Ok(Json(
        ActionResponse::success(
            format!("Connection {}", status),
            status.to_string(),
            conversation_id,
        )
        .with_data(connection_info(relationship, &me.id)),
    ))
}

pub async fn list_connections_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<ConnectionInfo>>>, ApiError> {
    let me = auth.require_profile().map_err(|e| auth_error(e, None))?;

    let connections: Vec<ConnectionInfo> = ConnectionService::new(db)
        .list(&me.id)
        .await
        .map_err(|e| service_error(e, None))?
        .into_iter()
        .map(|rel| connection_info(rel, &me.id))
        .collect();

    Ok(Json(DataResponse::success(
        format!("{} connections", connections.len()),
        connections,
        None,
    )))
}

fn connection_info(relationship: Relationship, me: &str) -> ConnectionInfo {
    ConnectionInfo {
        outgoing: relationship.requester_id == me,
        id: relationship.id,
        requester_id: relationship.requester_id,
        receiver_id: relationship.receiver_id,
        status: relationship.status,
    }
}
