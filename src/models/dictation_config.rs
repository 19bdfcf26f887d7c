use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORDS_PER_DICTATION: i64 = 10;
pub const DEFAULT_REVIEW_DAYS: i64 = 3;
pub const DEFAULT_DICTATION_INTERVAL: i64 = 5;
pub const DEFAULT_DICTATION_RATIO: i64 = 100;

/// Per-child dictation settings.
///
/// A config row is created lazily with the defaults above the first time it
/// is read or updated. Only `words_per_dictation` feeds task creation; the
/// remaining fields are stored and returned as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictationConfig {
    pub child_id: i64,
    /// Target number of words drawn when sampling a curriculum unit.
    pub words_per_dictation: i64,
    pub review_days: i64,
    pub dictation_interval: i64,
    /// Percentage of eligible words to dictate.
    pub dictation_ratio: i64,
    pub wrong_words_only: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a child's config. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDictationConfigInput {
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub words_per_dictation: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub review_days: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub dictation_interval: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub dictation_ratio: Option<i64>,
    pub wrong_words_only: Option<bool>,
}
