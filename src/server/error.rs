use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::BuddyError;

/// Route-level error. Every handler maps its failures through this enum so
/// status codes stay consistent across routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream provider failure: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Required-field helper for request bodies.
    #[inline]
    pub fn missing_field(name: &str) -> Self {
        Self::Validation(format!("{} is required", name))
    }
}

impl From<BuddyError> for ApiError {
    #[inline]
    fn from(error: BuddyError) -> Self {
        match error {
            BuddyError::Extraction(message) => Self::Validation(message),
            BuddyError::Embedding(message)
            | BuddyError::VectorStore(message)
            | BuddyError::Completion(message) => Self::Upstream(message),
            other => Self::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    #[inline]
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Upstream(cause) => {
                tracing::error!("Upstream provider failure: {}", cause);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream provider error".to_string(),
                )
            }
            ApiError::Database(error) => {
                tracing::error!("Database error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Internal(error) => {
                tracing::error!("Internal error: {:#}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
