// src/models/profile.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Alumni,
    Faculty,
}

impl Role {
    /// Roles eligible to appear in mentor recommendations
    pub const MENTORS: [Role; 2] = [Role::Alumni, Role::Faculty];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::Faculty => "faculty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "alumni" | "alum" => Ok(Role::Alumni),
            "faculty" => Ok(Role::Faculty),
            other => anyhow::bail!("Unknown role: {}. Use student, alumni or faculty", other),
        }
    }
}

/// A user's identity and attribute record.
///
/// Every attribute the scorer reads is optional or may be empty; incomplete
/// profiles are the common case and are handled by `matching::normalize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing)]
    pub auth_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            department: None,
            graduation_year: None,
            employer: None,
            skills: Vec::new(),
            interests: Vec::new(),
            auth_uid: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_graduation_year(mut self, year: i32) -> Self {
        self.graduation_year = Some(year);
        self
    }

    pub fn with_employer(mut self, employer: impl Into<String>) -> Self {
        self.employer = Some(employer.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_auth_uid(mut self, uid: impl Into<String>) -> Self {
        self.auth_uid = Some(uid.into());
        self
    }
}

pub const MAX_TAGS: usize = 50;
pub const MAX_TAG_LEN: usize = 64;
pub const GRADUATION_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Fields an owner may change on their own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ProfileUpdate {
    /// Limits shared by the profile API and CSV import
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            anyhow::bail!("Display name cannot be empty");
        }

        if let Some(year) = self.graduation_year {
            if !GRADUATION_YEARS.contains(&year) {
                anyhow::bail!("Graduation year {} is out of range", year);
            }
        }

        for (field, tags) in [("skills", &self.skills), ("interests", &self.interests)] {
            if tags.len() > MAX_TAGS {
                anyhow::bail!("At most {} {} are allowed", MAX_TAGS, field);
            }
            if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LEN) {
                anyhow::bail!("'{}' is longer than {} characters", tag, MAX_TAG_LEN);
            }
        }

        Ok(())
    }

    pub fn apply_to(self, profile: &mut Profile) {
        profile.display_name = self.display_name;
        profile.role = self.role;
        profile.department = self.department;
        profile.graduation_year = self.graduation_year;
        profile.employer = self.employer;
        profile.skills = self.skills;
        profile.interests = self.interests;
    }
}

/// Raw `profiles` row; tags are stored as JSON arrays in TEXT columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub auth_uid: Option<String>,
    pub display_name: String,
    pub role: String,
    pub department: Option<String>,
    pub graduation_year: Option<i64>,
    pub employer: Option<String>,
    pub skills: String,
    pub interests: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        let role = row
            .role
            .parse()
            .with_context(|| format!("Invalid role stored for profile {}", row.id))?;
        let skills: Vec<String> = serde_json::from_str(&row.skills)
            .with_context(|| format!("Invalid skills stored for profile {}", row.id))?;
        let interests: Vec<String> = serde_json::from_str(&row.interests)
            .with_context(|| format!("Invalid interests stored for profile {}", row.id))?;
        let graduation_year = row
            .graduation_year
            .map(i32::try_from)
            .transpose()
            .with_context(|| format!("Graduation year out of range for profile {}", row.id))?;

        Ok(Profile {
            id: row.id,
            display_name: row.display_name,
            role,
            department: row.department,
            graduation_year,
            employer: row.employer,
            skills,
            interests,
            auth_uid: row.auth_uid,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(skills: &str) -> ProfileRow {
        ProfileRow {
            id: "p1".to_string(),
            auth_uid: None,
            display_name: "Ada".to_string(),
            role: "faculty".to_string(),
            department: Some("CS".to_string()),
            graduation_year: Some(2010),
            employer: None,
            skills: skills.to_string(),
            interests: "[]".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(" alumni ".parse::<Role>().unwrap(), Role::Alumni);
        assert_eq!("FACULTY".parse::<Role>().unwrap(), Role::Faculty);
        assert!("dean".parse::<Role>().is_err());
    }

    #[test]
    fn test_row_conversion() {
        let profile = Profile::try_from(row(r#"["Rust","SQL"]"#)).unwrap();
        assert_eq!(profile.role, Role::Faculty);
        assert_eq!(profile.skills, vec!["Rust", "SQL"]);
        assert_eq!(profile.graduation_year, Some(2010));
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_row_conversion_rejects_bad_tags() {
        assert!(Profile::try_from(row("not json")).is_err());
    }

    #[test]
    fn test_validate_update() {
        let data = || ProfileUpdate {
            display_name: "Ada".to_string(),
            graduation_year: Some(2024),
            skills: vec!["Rust".to_string()],
            ..ProfileUpdate::default()
        };
        assert!(data().validate().is_ok());

        let mut blank = data();
        blank.display_name = "  ".to_string();
        assert!(blank.validate().is_err());

        let mut ancient = data();
        ancient.graduation_year = Some(1492);
        assert!(ancient.validate().is_err());

        let mut noisy = data();
        noisy.interests = (0..=MAX_TAGS).map(|i| i.to_string()).collect();
        assert!(noisy.validate().is_err());

        let mut long = data();
        long.skills = vec!["x".repeat(MAX_TAG_LEN + 1)];
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_auth_uid_is_not_serialized() {
        let profile = Profile::new("p1", "Grace", Role::Alumni)
            .with_employer("Navy")
            .with_auth_uid("firebase-uid");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["employer"], "Navy");
        assert_eq!(json["role"], "alumni");
        assert!(json.get("auth_uid").is_none());
    }

    #[test]
    fn test_profile_deserializes_with_missing_fields() {
        let profile: Profile = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(profile.role, Role::Student);
        assert!(profile.skills.is_empty());
        assert!(profile.graduation_year.is_none());
    }
}
