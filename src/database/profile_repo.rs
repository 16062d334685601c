// src/database/profile_repo.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{Profile, ProfileRow, ProfileUpdate, Role};

const SQL_SELECT_PROFILE: &str = r#"
SELECT id, auth_uid, display_name, role, department, graduation_year, employer,
       skills, interests, created_at, updated_at
FROM profiles
"#;

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new profile with a fresh id
    pub async fn create(&self, auth_uid: Option<&str>, data: &ProfileUpdate) -> Result<Profile> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO profiles (id, auth_uid, display_name, role, department, graduation_year,
                                  employer, skills, interests, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(auth_uid)
        .bind(&data.display_name)
        .bind(data.role.as_str())
        .bind(&data.department)
        .bind(data.graduation_year)
        .bind(&data.employer)
        .bind(encode_tags(&data.skills)?)
        .bind(encode_tags(&data.interests)?)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to create profile for {}", data.display_name))?;

        info!("Created {} profile {} ({})", data.role, id, data.display_name);

        let mut profile = Profile::new(id, data.display_name.clone(), data.role);
        data.clone().apply_to(&mut profile);
        profile.auth_uid = auth_uid.map(str::to_string);
        profile.created_at = Some(now);
        profile.updated_at = Some(now);
        Ok(profile)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE id = ?", SQL_SELECT_PROFILE))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    pub async fn find_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "{} WHERE auth_uid = ?",
            SQL_SELECT_PROFILE
        ))
        .bind(auth_uid)
        .fetch_optional(self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    /// Profiles with any of `roles`, oldest first.
    ///
    /// The order is stable across calls, which keeps score ties reproducible.
    pub async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<Profile>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; roles.len()].join(", ");
        let sql = format!(
            "{} WHERE role IN ({}) ORDER BY created_at ASC, id ASC",
            SQL_SELECT_PROFILE, placeholders
        );

        let mut query = sqlx::query_as::<_, ProfileRow>(&sql);
        for role in roles {
            query = query.bind(role.as_str());
        }

        let rows = query.fetch_all(self.pool).await?;
        rows.into_iter().map(Profile::try_from).collect()
    }

    pub async fn list_all(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "{} ORDER BY created_at ASC, id ASC",
            SQL_SELECT_PROFILE
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    /// Overwrite the editable fields. Returns `None` if no such profile.
    pub async fn update(&self, id: &str, data: &ProfileUpdate) -> Result<Option<Profile>> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET display_name = ?, role = ?, department = ?, graduation_year = ?,
                employer = ?, skills = ?, interests = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.display_name)
        .bind(data.role.as_str())
        .bind(&data.department)
        .bind(data.graduation_year)
        .bind(&data.employer)
        .bind(encode_tags(&data.skills)?)
        .bind(encode_tags(&data.interests)?)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!("Updated profile {}", id);
        self.find_by_id(id).await
    }
}

fn encode_tags(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).context("Failed to encode tags")
}
