use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use backlot_core::error::CoreError;

use crate::config::is_production;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{error, issues?}` JSON shape
/// every error response uses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `backlot_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource existed but is permanently unusable
    /// (an expired unsubscribe token).
    #[error("Gone: {0}")]
    Gone(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, issues) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
                }
                CoreError::InvalidInput { message, issues } => (
                    StatusCode::BAD_REQUEST,
                    message.clone(),
                    Some(serde_json::to_value(issues).unwrap_or_default()),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, internal_message(msg), None)
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Gone(msg) => (StatusCode::GONE, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_message(msg), None)
            }
        };

        let body = match issues {
            Some(issues) => json!({ "error": message, "issues": issues }),
            None => json!({ "error": message }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// What a 500 body says: the underlying message outside production, a
/// generic line in production.
fn internal_message(detail: &str) -> String {
    if is_production() {
        "An internal error occurred".to_string()
    } else {
        detail.to_string()
    }
}

/// Classify a sqlx error into a status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409. The named constraints are the race-authoritative backstop
///   behind the handlers' proactive collision pre-checks.
/// - Everything else maps to 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Option<serde_json::Value>) {
    match err {
        sqlx::Error::RowNotFound => {
            (StatusCode::NOT_FOUND, "Resource not found".to_string(), None)
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(&db_err.to_string()),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(&other.to_string()),
                None,
            )
        }
    }
}
