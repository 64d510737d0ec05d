use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// StoreError
///
/// Failures reported by a `ResourceStore`. The service layer converts these into
/// `AppError` once it knows which resource kind was involved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A unique constraint (e.g. `blogs.slug`) rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// AppError
///
/// The error taxonomy surfaced at the HTTP boundary. Every variant renders as
/// `{ "error": "<message>" }` with the matching status code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid or expired session, or a role below the one required.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Store or collaborator failure. The detail is logged, never returned.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl AppError {
    /// Maps a store failure for the given resource kind.
    pub fn from_store(kind: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(kind),
            StoreError::Conflict(constraint) => {
                AppError::Conflict(format!("{kind} violates unique constraint `{constraint}`"))
            }
            StoreError::Database(e) => AppError::OperationFailed(format!("{kind}: {e}")),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::OperationFailed(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
