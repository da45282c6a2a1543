// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Media(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Media(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({"error": "Hierarchical number already exists"})),
                )
                    .into_response();
            }
            AppError::Internal(_) | AppError::Database(_) => {
                tracing::error!(error = %self, "request failed");
                if cfg!(debug_assertions) {
                    self.to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
            _ => {
                tracing::warn!(error = %self, status = %status.as_u16(), "request rejected");
                self.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::upstream("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Media("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::NotConfigured("YouTube OAuth").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::NotConfigured("YouTube OAuth").to_string(),
            "YouTube OAuth is not configured"
        );
    }
}
