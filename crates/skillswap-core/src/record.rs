// crates/skillswap-core/src/record.rs

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SkillError;

/// Highest star rating a record can carry. 0 means "unrated".
pub const MAX_RATING: u8 = 5;

/// Fixed enumeration of skill categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillCategory {
    Programming,
    Cooking,
    Language,
    Other,
}

impl SkillCategory {
    /// All categories in display order.
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Programming,
        SkillCategory::Cooking,
        SkillCategory::Language,
        SkillCategory::Other,
    ];

    /// Canonical name, as stored in record blobs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "Programming",
            SkillCategory::Cooking => "Cooking",
            SkillCategory::Language => "Language",
            SkillCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SkillError::InvalidDraft("Please select a skill type".to_string()))
    }
}

/// The submission form: what a user fills in before the placeholder
/// encoding step turns it into a record payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillDraft {
    #[serde(rename = "skillType")]
    pub category: SkillCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience: String,
}

impl SkillDraft {
    pub fn new(category: SkillCategory) -> Self {
        Self {
            category,
            description: String::new(),
            experience: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = experience.into();
        self
    }
}

/// One shared skill offer, keyed by `id` in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillRecord {
    /// Client-generated identifier (time prefix + random suffix).
    pub id: String,
    /// Opaque output of the placeholder privacy-encoding step.
    pub payload: String,
    /// Creation time in unix seconds. Immutable.
    pub timestamp: i64,
    /// Wallet address of the submitter. Immutable.
    pub owner: String,
    pub category: SkillCategory,
    /// 0 = unrated, otherwise 1..=5.
    pub rating: u8,
}

impl SkillRecord {
    /// Assemble a fresh, unrated record stamped with the current time.
    pub fn new(id: String, payload: String, owner: String, category: SkillCategory) -> Self {
        Self {
            id,
            payload,
            timestamp: Utc::now().timestamp(),
            owner,
            category,
            rating: 0,
        }
    }

    /// Copy of this record with only the rating replaced.
    pub fn with_rating(&self, rating: u8) -> Self {
        Self {
            rating,
            ..self.clone()
        }
    }
}

/// Generate a record identifier: `<unix millis>-<7 base36 chars>`.
///
/// Uniqueness is probabilistic; see `SkillRegistryController::submit` for
/// the collision check performed before a record is written.
pub fn generate_record_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// First `n` characters of `s`, for short display forms like `0x1234...`.
pub fn short_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("cooking".parse::<SkillCategory>().unwrap(), SkillCategory::Cooking);
        assert_eq!(" LANGUAGE ".parse::<SkillCategory>().unwrap(), SkillCategory::Language);
        assert!("".parse::<SkillCategory>().is_err());
        assert!("juggling".parse::<SkillCategory>().is_err());
    }

    #[test]
    fn test_generate_record_id_shape() {
        let id = generate_record_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 7);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_record_id(), generate_record_id());
    }

    #[test]
    fn test_with_rating_preserves_other_fields() {
        let record = SkillRecord::new(
            "1-abc".into(),
            "FHE-xyz".into(),
            "0xAAA".into(),
            SkillCategory::Programming,
        );
        let rated = record.with_rating(4);
        assert_eq!(rated.rating, 4);
        assert_eq!(rated.with_rating(record.rating), record);
    }

    #[test]
    fn test_short_prefix() {
        assert_eq!(short_prefix("0x1234abcd", 6), "0x1234");
        assert_eq!(short_prefix("0x1", 6), "0x1");
    }
}
