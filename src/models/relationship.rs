// src/models/relationship.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Pending => "pending",
            RelationshipStatus::Accepted => "accepted",
            RelationshipStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(RelationshipStatus::Pending),
            "accepted" => Ok(RelationshipStatus::Accepted),
            "rejected" => Ok(RelationshipStatus::Rejected),
            other => anyhow::bail!("Unknown relationship status: {}", other),
        }
    }
}

/// Directed connection between two profiles. Symmetric once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub requester_id: String,
    pub receiver_id: String,
    pub status: RelationshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    pub fn involves(&self, profile_id: &str) -> bool {
        self.requester_id == profile_id || self.receiver_id == profile_id
    }

    /// The profile on the other end of this edge, if `profile_id` is on it
    pub fn other_side(&self, profile_id: &str) -> Option<&str> {
        if self.requester_id == profile_id {
            Some(&self.receiver_id)
        } else if self.receiver_id == profile_id {
            Some(&self.requester_id)
        } else {
            None
        }
    }
}

/// Order-independent key for a pair of profile ids.
///
/// Both directions of a pair map to the same key, which is what the
/// `relationships` unique index is built on.
pub fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelationshipRow {
    pub id: String,
    pub requester_id: String,
    pub receiver_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RelationshipRow> for Relationship {
    type Error = anyhow::Error;

    fn try_from(row: RelationshipRow) -> Result<Self> {
        let status = row
            .status
            .parse()
            .with_context(|| format!("Invalid status stored for relationship {}", row.id))?;

        Ok(Relationship {
            id: row.id,
            requester_id: row.requester_id,
            receiver_id: row.receiver_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(pair_key("a", "b"), pair_key("b", "a"));
        assert_eq!(pair_key("b", "a"), ("a", "b"));
    }

    #[test]
    fn test_other_side() {
        let now = Utc::now();
        let rel = Relationship {
            id: "r1".to_string(),
            requester_id: "a".to_string(),
            receiver_id: "b".to_string(),
            status: RelationshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(rel.other_side("a"), Some("b"));
        assert_eq!(rel.other_side("b"), Some("a"));
        assert_eq!(rel.other_side("c"), None);
        assert!(rel.involves("b"));
    }
}
