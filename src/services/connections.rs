// src/services/connections.rs
use anyhow::Result;
use std::fmt;
use tracing::{info, warn};

use crate::database::Database;
use crate::models::{Relationship, RelationshipStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    SelfRequest,
    UnknownProfile(String),
    AlreadyExists(RelationshipStatus),
    NotFound,
    NotReceiver,
    NotPending(RelationshipStatus),
}

impl ConnectionError {
    pub fn message(&self) -> String {
        match self {
            ConnectionError::SelfRequest => "You cannot connect with yourself".to_string(),
            ConnectionError::UnknownProfile(id) => format!("Profile '{}' not found", id),
            ConnectionError::AlreadyExists(status) => {
                format!("A {} connection already exists between these profiles", status)
            }
            ConnectionError::NotFound => "Connection not found".to_string(),
            ConnectionError::NotReceiver => {
                "Only the receiver of a request can respond to it".to_string()
            }
            ConnectionError::NotPending(status) => {
                format!("Connection was already {}", status)
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ConnectionError::SelfRequest => "SELF_CONNECTION",
            ConnectionError::UnknownProfile(_) => "PROFILE_NOT_FOUND",
            ConnectionError::AlreadyExists(_) => "CONNECTION_EXISTS",
            ConnectionError::NotFound => "CONNECTION_NOT_FOUND",
            ConnectionError::NotReceiver => "NOT_AUTHORIZED",
            ConnectionError::NotPending(_) => "CONNECTION_NOT_PENDING",
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ConnectionError {}

pub struct ConnectionService<'a> {
    db: &'a Database,
}

impl<'a> ConnectionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Open a pending request from `requester_id` to `receiver_id`
    pub async fn request_connection(
        &self,
        requester_id: &str,
        receiver_id: &str,
    ) -> Result<Relationship> {
        if requester_id == receiver_id {
            return Err(ConnectionError::SelfRequest.into());
        }

        for id in [requester_id, receiver_id] {
            if self.db.profiles().find_by_id(id).await?.is_none() {
                return Err(ConnectionError::UnknownProfile(id.to_string()).into());
            }
        }

        let relationships = self.db.relationships();
        if let Some(existing) = relationships.find_between(requester_id, receiver_id).await? {
            warn!(
                "Connection request {} -> {} rejected, existing relationship {} is {}",
                requester_id, receiver_id, existing.id, existing.status
            );
            return Err(ConnectionError::AlreadyExists(existing.status).into());
        }

        match relationships.create(requester_id, receiver_id).await {
            Ok(relationship) => Ok(relationship),
            Err(e) if is_unique_violation(&e) => {
                // a concurrent request for the same pair won the insert
                let existing = relationships
                    .find_between(requester_id, receiver_id)
                    .await?
                    .ok_or(e)?;
                Err(ConnectionError::AlreadyExists(existing.status).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Accept or reject a pending request. Only the receiver may respond.
    pub async fn respond(
        &self,
        relationship_id: &str,
        actor_id: &str,
        accept: bool,
    ) -> Result<Relationship> {
        let relationships = self.db.relationships();
        let mut relationship = relationships
            .find_by_id(relationship_id)
            .await?
            .ok_or(ConnectionError::NotFound)?;

        if relationship.receiver_id != actor_id {
            return Err(ConnectionError::NotReceiver.into());
        }
        if relationship.status != RelationshipStatus::Pending {
            return Err(ConnectionError::NotPending(relationship.status).into());
        }

        let status = if accept {
            RelationshipStatus::Accepted
        } else {
            RelationshipStatus::Rejected
        };

        if !relationships.resolve_pending(relationship_id, status).await? {
            return Err(match relationships.find_by_id(relationship_id).await? {
                Some(current) => ConnectionError::NotPending(current.status),
                None => ConnectionError::NotFound,
            }
            .into());
        }

        info!(
            "Profile {} {} connection {}",
            actor_id, status, relationship_id
        );

        relationship.status = status;
        Ok(relationships
            .find_by_id(relationship_id)
            .await?
            .unwrap_or(relationship))
    }

    pub async fn list(&self, profile_id: &str) -> Result<Vec<Relationship>> {
        self.db.relationships().list_for_profile(profile_id).await
    }
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
