//! Success envelope and the payloads carried inside it.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{DictationConfig, DictationTask};

/// `{"status": "success", "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success".to_string(),
            data,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    pub config: DictationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub task: DictationTask,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackData<F> {
    pub feedback: F,
}
