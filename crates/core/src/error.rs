//! Domain error taxonomy.
//!
//! Every failure the HTTP layer can report maps onto one of these variants.
//! The API crate converts them to status codes: NotFound -> 404,
//! Validation/InvalidInput -> 400, Conflict -> 409, Unauthorized -> 401,
//! Forbidden -> 403, Internal -> 500.

use crate::validate::Issues;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// Schema or format failure. Carries every offending field, not just
    /// the first one encountered.
    #[error("{message}")]
    InvalidInput { message: String, issues: Issues },

    #[error("{0}")]
    Conflict(String),

    /// Missing credentials or insufficient role. Role failures deliberately
    /// land here (401) rather than on `Forbidden`.
    #[error("{0}")]
    Unauthorized(String),

    /// Self-action guard (an admin deleting or demoting their own account).
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Build an `InvalidInput` error from a single field failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut issues = Issues::new();
        issues.push(field, message);
        CoreError::InvalidInput {
            message: "Validation failed".to_string(),
            issues,
        }
    }

    /// Build an `InvalidInput` error from a collected issue set.
    pub fn invalid(issues: Issues) -> Self {
        CoreError::InvalidInput {
            message: "Validation failed".to_string(),
            issues,
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
