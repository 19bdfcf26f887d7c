use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::parse_body;

use crate::api::error::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::response::{ConfigData, Envelope, TaskData};
use crate::db::Database;
use crate::models::*;
use crate::selection::{select_words, WordSource};

#[derive(Debug, Deserialize)]
pub struct ConfigQuery {
    /// Kept as text so a non-numeric or zero id reads as missing.
    pub child_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    #[serde(default, deserialize_with = "crate::models::lenient::option_i64")]
    pub child_id: Option<i64>,
    #[serde(flatten)]
    pub fields: UpdateDictationConfigInput,
}

fn owned_child(db: &Database, child_id: i64, user: CurrentUser) -> Result<Child, ApiError> {
    db.find_child(child_id, user.id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::ChildNotFound)
}

pub async fn get_config(
    State(db): State<Database>,
    user: CurrentUser,
    Query(query): Query<ConfigQuery>,
) -> Result<Json<Envelope<ConfigData>>, ApiError> {
    let child_id = query
        .child_id
        .and_then(|id| id.trim().parse::<i64>().ok())
        .filter(|id| *id != 0)
        .ok_or(ApiError::MissingParam("child_id"))?;

    let child = owned_child(&db, child_id, user)?;
    let config = db
        .get_or_create_config(&child)
        .map_err(ApiError::database)?;

    Ok(Envelope::success(ConfigData { config }))
}

pub async fn update_config(
    State(db): State<Database>,
    user: CurrentUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<ConfigData>>, ApiError> {
    let request: UpdateConfigRequest = parse_body(payload, "child_id")?;
    let child_id = request.child_id.ok_or(ApiError::MissingParam("child_id"))?;

    let child = owned_child(&db, child_id, user)?;
    let config = db
        .update_config(&child, request.fields)
        .map_err(ApiError::database)?;

    tracing::info!("Updated dictation config for child {}", child.id);
    Ok(Envelope::success(ConfigData { config }))
}

/// Create a dictation task for one of the caller's children.
///
/// Words come from the request's `words` list if present, otherwise from a
/// sample of the requested `unit` at the child's curriculum position, sized
/// by the child's `words_per_dictation`.
pub async fn create_task(
    State(db): State<Database>,
    user: CurrentUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<TaskData>>, ApiError> {
    let input: CreateTaskInput = parse_body(payload, "child_id")?;
    let child_id = input.child_id.ok_or(ApiError::MissingParam("child_id"))?;

    let child = owned_child(&db, child_id, user)?;
    let config = db
        .get_or_create_config(&child)
        .map_err(ApiError::database)?;

    let source = WordSource::from_request(input.words, input.unit);
    let unit = match source {
        WordSource::Unit(unit) => Some(unit),
        _ => None,
    };

    let words = select_words(
        source,
        &child.curriculum_position(),
        &db,
        config.words_per_dictation,
        &mut rand::thread_rng(),
    )
    .map_err(ApiError::internal)?;

    let task = db
        .save_task(&child, user.id, unit, &words)
        .map_err(ApiError::database)?;

    tracing::info!(
        "Created dictation task {} for child {} with {} words",
        task.id,
        child.id,
        task.items.len()
    );
    Ok(Envelope::success(TaskData { task }))
}
