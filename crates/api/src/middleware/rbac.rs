//! Capability-based authorization extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! grant the required [`Capability`]. An insufficient role is reported as 401,
//! matching the behaviour of a missing or invalid token; 403 is reserved for
//! the self-action guards on the user admin routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use backlot_core::error::CoreError;
use backlot_core::roles::Capability;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_capability(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !user.role.grants(capability) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Insufficient permissions".into(),
        )));
    }
    Ok(user)
}

/// Requires [`Capability::ManageContent`] (admin or editor).
///
/// ```ignore
/// async fn create_film(RequireContent(user): RequireContent) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireContent(pub AuthUser);

impl FromRequestParts<AppState> for RequireContent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_capability(parts, state, Capability::ManageContent).await?;
        Ok(RequireContent(user))
    }
}

/// Requires [`Capability::DeleteContent`] (admin only).
pub struct RequireContentDelete(pub AuthUser);

impl FromRequestParts<AppState> for RequireContentDelete {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_capability(parts, state, Capability::DeleteContent).await?;
        Ok(RequireContentDelete(user))
    }
}

/// Requires [`Capability::ManageUsers`] (admin only).
pub struct RequireUsersAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireUsersAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_capability(parts, state, Capability::ManageUsers).await?;
        Ok(RequireUsersAdmin(user))
    }
}

/// Requires [`Capability::ManageSubscribers`] (admin only).
pub struct RequireSubscribersAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSubscribersAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_capability(parts, state, Capability::ManageSubscribers).await?;
        Ok(RequireSubscribersAdmin(user))
    }
}

/// Requires [`Capability::ViewActivity`] (admin only).
pub struct RequireActivity(pub AuthUser);

impl FromRequestParts<AppState> for RequireActivity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_capability(parts, state, Capability::ViewActivity).await?;
        Ok(RequireActivity(user))
    }
}
