//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    /// Absent for OAuth-only accounts.
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub google_id: Option<String>,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            role: user.role,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Wire DTO for `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `editor` when omitted.
    pub role: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Minimum accepted password length for staff accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

impl CreateUser {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("name", validate::required(&self.name));
        issues.check("email", validate::email(&self.email));
        issues.check("password", validate::min_len(&self.password, MIN_PASSWORD_LEN));
        if let Some(role) = &self.role {
            issues.check("role", validate::role_name(role));
        }
        if let Some(image) = &self.image {
            issues.check("image", validate::http_url_or_empty(image));
        }
        issues.into_result()
    }
}

/// Insert payload built by the handler (password already hashed).
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub google_id: Option<String>,
    pub role: String,
}

/// Wire DTO for `PATCH /users/id/{id}`.
///
/// Strict: `email`, `password`, and `id` are deliberately not declared, so a
/// client sending them gets a 400 instead of a silent privilege escalation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<String>,
    pub image: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        if let Some(name) = &self.name {
            issues.check("name", validate::required(name));
        }
        if let Some(role) = &self.role {
            issues.check("role", validate::role_name(role));
        }
        if let Some(image) = &self.image {
            issues.check("image", validate::http_url_or_empty(image));
        }
        issues.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_valid_email_and_password() {
        let create: CreateUser = serde_json::from_value(serde_json::json!({
            "name": "A", "email": "not-an-email", "password": "short"
        }))
        .expect("shape parses");
        let issues = create.validate().expect_err("two bad fields");
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn update_rejects_email_and_password() {
        for field in ["email", "password", "id"] {
            let result: Result<UpdateUser, _> =
                serde_json::from_value(serde_json::json!({field: "x"}));
            assert!(result.is_err(), "{field} must be rejected on update");
        }
    }

    #[test]
    fn update_accepts_declared_fields() {
        let patch: UpdateUser = serde_json::from_value(
            serde_json::json!({"name": "New Name", "role": "editor"}),
        )
        .expect("declared fields parse");
        assert!(patch.validate().is_ok());
    }
}
