mod dictation;
mod feedback;

use axum::{extract::rejection::JsonRejection, response::IntoResponse, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;

pub use dictation::*;
pub use feedback::*;

/// Decode a JSON body that must carry `required`.
///
/// An absent or non-JSON body, or a missing/null `required` field, is a
/// missing parameter. Any other decoding failure is an invalid body.
fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
    required: &'static str,
) -> Result<T, ApiError> {
    let Ok(Json(value)) = payload else {
        return Err(ApiError::MissingParam(required));
    };
    if value.get(required).map_or(true, Value::is_null) {
        return Err(ApiError::MissingParam(required));
    }
    serde_json::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
