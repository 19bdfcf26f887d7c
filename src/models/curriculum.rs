use serde::{Deserialize, Serialize};

/// A catalog entry placing one word in a textbook unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurriculumItem {
    pub id: i64,
    pub grade: i64,
    pub semester: i64,
    pub textbook_version: String,
    pub unit: i64,
    pub word: String,
}

/// A catalog entry as read from an import file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumItemInput {
    pub grade: i64,
    pub semester: i64,
    pub textbook_version: String,
    pub unit: i64,
    pub word: String,
}
