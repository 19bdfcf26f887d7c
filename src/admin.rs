//! Operator actions run from the command line: registering children and
//! answering feedback.

use anyhow::Result;

use crate::db::Database;
use crate::models::*;

/// Parse a feedback status for the CLI.
pub fn parse_feedback_status(s: &str) -> Result<FeedbackStatus, String> {
    FeedbackStatus::from_str(s.trim())
        .ok_or_else(|| format!("unknown status {s:?} (expected pending, processing or resolved)"))
}

pub fn add_child(db: &Database, user_id: i64, input: CreateChildInput) -> Result<Child> {
    let child = db.create_child(user_id, input)?;
    tracing::info!("Registered child {} for user {}", child.id, user_id);
    Ok(child)
}

/// Record an admin reply on a feedback entry.
pub fn reply_to_feedback(db: &Database, feedback_id: i64, content: &str) -> Result<FeedbackReply> {
    if content.trim().is_empty() {
        anyhow::bail!("Reply content is empty");
    }
    let reply = db.add_feedback_reply(
        feedback_id,
        CreateReplyInput {
            content: content.to_string(),
            is_admin: true,
        },
    )?;
    tracing::info!("Replied to feedback {}", feedback_id);
    Ok(reply)
}

pub fn set_feedback_status(db: &Database, feedback_id: i64, status: FeedbackStatus) -> Result<()> {
    if !db.set_feedback_status(feedback_id, status)? {
        anyhow::bail!("Feedback {} not found", feedback_id);
    }
    tracing::info!("Feedback {} is now {}", feedback_id, status.as_str());
    Ok(())
}
