//! Error envelope returned by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MISSING_REQUIRED_PARAM: u32 = 1001;
pub const UNAUTHORIZED: u32 = 1002;
pub const INVALID_BODY: u32 = 1003;
pub const CHILD_NOT_FOUND: u32 = 2001;
pub const RESOURCE_NOT_FOUND: u32 = 2002;
pub const INTERNAL_ERROR: u32 = 5000;
pub const DATABASE_ERROR: u32 = 5001;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    /// The body is JSON but a field has the wrong shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Child not found")]
    ChildNotFound,

    #[error("Resource not found")]
    ResourceNotFound,

    /// Persisting a change failed. The inner error is logged, never returned.
    #[error("Database error")]
    Database(anyhow::Error),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn database(e: anyhow::Error) -> Self {
        Self::Database(e)
    }

    pub fn internal(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParam(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ChildNotFound | Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::MissingParam(_) => MISSING_REQUIRED_PARAM,
            Self::Unauthorized => UNAUTHORIZED,
            Self::InvalidBody(_) => INVALID_BODY,
            Self::ChildNotFound => CHILD_NOT_FOUND,
            Self::ResourceNotFound => RESOURCE_NOT_FOUND,
            Self::Database(_) => DATABASE_ERROR,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }
}

/// `{"status": "error", "code": ..., "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub code: u32,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => tracing::error!("Database error: {:#}", e),
            Self::Internal(e) => tracing::error!("Internal error: {:#}", e),
            other => tracing::warn!("Request rejected: {}", other),
        }

        let body = ErrorBody {
            status: "error".to_string(),
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::database(anyhow::anyhow!("UNIQUE constraint failed: secret_table.id"));
        assert_eq!(err.to_string(), "Database error");
        assert_eq!(err.code(), DATABASE_ERROR);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_param_names_the_field() {
        let err = ApiError::MissingParam("child_id");
        assert_eq!(err.to_string(), "Missing required parameter: child_id");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_variants_have_distinct_codes() {
        assert_eq!(ApiError::ChildNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ResourceNotFound.status(), StatusCode::NOT_FOUND);
        assert_ne!(ApiError::ChildNotFound.code(), ApiError::ResourceNotFound.code());
    }
}
