use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-submitted feedback about the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    /// Free-form category such as "bug", "suggestion" or "general".
    #[serde(rename = "type")]
    pub kind: String,
    pub status: FeedbackStatus,
    pub contact: Option<String>,
    pub images: Vec<String>,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Handling status of a feedback entry.
///
/// - `Pending`: Not yet looked at
/// - `Processing`: An admin is working on it
/// - `Resolved`: Closed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    Processing,
    Resolved,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Resolved => "resolved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// A reply on a feedback entry, usually from an admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackReply {
    pub id: i64,
    pub feedback_id: i64,
    pub content: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A feedback entry with its replies, oldest reply first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackWithReplies {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub replies: Vec<FeedbackReply>,
}

/// Request body for submitting feedback.
///
/// `title` and `content` are required; they are optional here so a missing
/// field surfaces as a parameter error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFeedbackInput {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub contact: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A validated feedback submission ready to store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub title: String,
    pub content: String,
    pub kind: String,
    pub contact: Option<String>,
    pub images: Vec<String>,
}

/// Input for recording a reply on a feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyInput {
    pub content: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// One page of a user's feedback, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub feedbacks: Vec<Feedback>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}
