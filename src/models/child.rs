use serde::{Deserialize, Serialize};

/// A child practising dictation, owned by exactly one user.
///
/// The curriculum position (`grade`, `semester`, `textbook_version`) scopes
/// which catalog words are eligible when a task is drawn from a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Child {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub grade: i64,
    pub semester: i64,
    /// Published curriculum edition the child follows (e.g. "renjiao").
    pub textbook_version: String,
}

impl Child {
    pub fn curriculum_position(&self) -> CurriculumPosition {
        CurriculumPosition {
            grade: self.grade,
            semester: self.semester,
            textbook_version: self.textbook_version.clone(),
        }
    }
}

/// Where a child currently sits in the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumPosition {
    pub grade: i64,
    pub semester: i64,
    pub textbook_version: String,
}

/// Input for registering a child under a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChildInput {
    pub name: String,
    pub grade: i64,
    pub semester: i64,
    pub textbook_version: String,
}
