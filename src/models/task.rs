use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of words a child is quizzed on in one session.
///
/// Items are fixed when the task is created and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictationTask {
    pub id: i64,
    pub child_id: i64,
    pub user_id: i64,
    /// The curriculum unit the words were drawn from, if any.
    pub unit: Option<i64>,
    pub status: TaskStatus,
    pub items: Vec<DictationTaskItem>,
    pub created_at: DateTime<Utc>,
}

impl DictationTask {
    pub fn words(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.word.as_str()).collect()
    }
}

/// One word of a dictation task, in dictation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictationTaskItem {
    pub id: i64,
    pub position: i64,
    pub word: String,
}

/// The progress status of a dictation task. Tasks are created pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Request body for creating a task.
///
/// `words` wins over `unit`; with neither, smart selection applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub child_id: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient::option_i64"
    )]
    pub unit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
}
