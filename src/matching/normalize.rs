// src/matching/normalize.rs
//! Single normalization step applied to a profile before scoring.
//!
//! All "default when absent" policy lives here so the arithmetic in
//! `scorer.rs` never sees an `Option` or a blank tag.

use std::collections::HashSet;

use crate::matching::MatchWeights;
use crate::models::Profile;

/// Tag set that compares case-insensitively but remembers how the tag was
/// first spelled.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    /// (original spelling, lowercase key), first occurrence order
    entries: Vec<(String, String)>,
    keys: HashSet<String>,
}

impl TagSet {
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = TagSet::default();
        for tag in tags {
            let trimmed = tag.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_lowercase();
            if set.keys.insert(key.clone()) {
                set.entries.push((trimmed.to_string(), key));
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags of `self` also present in `other`, in `self`'s spelling and order
    pub fn intersection(&self, other: &TagSet) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, key)| other.keys.contains(key))
            .map(|(original, _)| original.clone())
            .collect()
    }
}

/// Which side of the comparison a profile is on; decides the default year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Requester,
    Candidate,
}

#[derive(Debug, Clone)]
pub struct NormalizedProfile {
    pub skills: TagSet,
    pub interests: TagSet,
    /// Lowercased, trimmed; `None` when absent or blank
    pub department: Option<String>,
    /// Always populated; falls back to the side's default year
    pub graduation_year: i32,
}

impl NormalizedProfile {
    pub fn new(profile: &Profile, side: Side, weights: &MatchWeights) -> Self {
        let department = profile
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase);

        let graduation_year = profile.graduation_year.unwrap_or(match side {
            Side::Requester => weights.default_requester_year,
            Side::Candidate => weights.default_candidate_year,
        });

        Self {
            skills: TagSet::from_tags(&profile.skills),
            interests: TagSet::from_tags(&profile.interests),
            department,
            graduation_year,
        }
    }
}
