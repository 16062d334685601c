// src/database/relationship_repo.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::models::{pair_key, Relationship, RelationshipRow, RelationshipStatus};

const SQL_SELECT_RELATIONSHIP: &str = r#"
SELECT id, requester_id, receiver_id, status, created_at, updated_at
FROM relationships
"#;

pub struct RelationshipRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RelationshipRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending relationship.
    ///
    /// Fails on the unique pair index if any record already links the two
    /// profiles, whichever direction it was created in.
    pub async fn create(&self, requester_id: &str, receiver_id: &str) -> Result<Relationship> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let (low, high) = pair_key(requester_id, receiver_id);
        let status = RelationshipStatus::Pending;

        sqlx::query(
            r#"
            INSERT INTO relationships (id, requester_id, receiver_id, pair_low, pair_high,
                                       status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(requester_id)
        .bind(receiver_id)
        .bind(low)
        .bind(high)
        .bind(status.as_str())
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!(
            "Created relationship {} from {} to {}",
            id, requester_id, receiver_id
        );

        Ok(Relationship {
            id,
            requester_id: requester_id.to_string(),
            receiver_id: receiver_id.to_string(),
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Relationship>> {
        let row = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{} WHERE id = ?",
            SQL_SELECT_RELATIONSHIP
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Relationship::try_from).transpose()
    }

    /// The record linking `a` and `b` in either direction
    pub async fn find_between(&self, a: &str, b: &str) -> Result<Option<Relationship>> {
        let (low, high) = pair_key(a, b);
        let row = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{} WHERE pair_low = ? AND pair_high = ?",
            SQL_SELECT_RELATIONSHIP
        ))
        .bind(low)
        .bind(high)
        .fetch_optional(self.pool)
        .await?;

        row.map(Relationship::try_from).transpose()
    }

    /// Move a pending relationship to `status` in a single statement.
    ///
    /// Returns `false` when the record is missing or no longer pending.
    pub async fn resolve_pending(&self, id: &str, status: RelationshipStatus) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE relationships
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(RelationshipStatus::Pending.as_str())
        .execute(self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Relationship {} is now {}", id, status);
        }
        Ok(updated)
    }

    /// Every relationship touching `profile_id`, newest first
    pub async fn list_for_profile(&self, profile_id: &str) -> Result<Vec<Relationship>> {
        let rows = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{} WHERE requester_id = ? OR receiver_id = ? ORDER BY created_at DESC, id ASC",
            SQL_SELECT_RELATIONSHIP
        ))
        .bind(profile_id)
        .bind(profile_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Relationship::try_from).collect()
    }

    /// Ids on the other side of every relationship touching `profile_id`,
    /// whatever its status
    pub async fn related_profile_ids(&self, profile_id: &str) -> Result<HashSet<String>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT CASE WHEN requester_id = ? THEN receiver_id ELSE requester_id END
            FROM relationships
            WHERE requester_id = ? OR receiver_id = ?
            "#,
        )
        .bind(profile_id)
        .bind(profile_id)
        .bind(profile_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
