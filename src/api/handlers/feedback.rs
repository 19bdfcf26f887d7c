use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::parse_body;

use crate::api::error::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::response::{Envelope, FeedbackData};
use crate::db::Database;
use crate::models::*;

pub const DEFAULT_FEEDBACK_TYPE: &str = "general";
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Query parameters for listing the caller's feedback.
#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Defaults to 20.
    pub per_page: Option<i64>,
    /// Only entries in this status (pending/processing/resolved).
    pub status: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingParam(name))
}

pub async fn create_feedback(
    State(db): State<Database>,
    user: CurrentUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<FeedbackData<Feedback>>>, ApiError> {
    let input: CreateFeedbackInput = parse_body(payload, "title")?;

    let feedback = NewFeedback {
        title: required(input.title, "title")?,
        content: required(input.content, "content")?,
        kind: input
            .kind
            .unwrap_or_else(|| DEFAULT_FEEDBACK_TYPE.to_string()),
        contact: input.contact,
        images: input.images,
    };

    let feedback = db
        .create_feedback(user.id, feedback)
        .map_err(ApiError::database)?;

    tracing::info!("User {} submitted feedback {}", user.id, feedback.id);
    Ok(Envelope::success(FeedbackData { feedback }))
}

pub async fn list_feedback(
    State(db): State<Database>,
    user: CurrentUser,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<Json<Envelope<FeedbackPage>>, ApiError> {
    let status = query.status.as_deref().filter(|s| !s.is_empty());

    db.list_feedback(
        user.id,
        status,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(DEFAULT_PER_PAGE),
    )
    .map(Envelope::success)
    .map_err(ApiError::internal)
}

pub async fn get_feedback_detail(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<FeedbackData<FeedbackWithReplies>>>, ApiError> {
    let feedback = db
        .get_feedback_detail(id, user.id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::ResourceNotFound)?;

    Ok(Envelope::success(FeedbackData { feedback }))
}
