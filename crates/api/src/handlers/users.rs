//! Handlers for the `/users` resource. Every route requires the
//! user-administration capability (admin).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::roles::Role;
use backlot_core::validate::normalize_email;
use backlot_db::models::user::{CreateUser, NewUser, UpdateUser, UserResponse};
use backlot_db::repositories::{SessionRepo, UserRepo};

use crate::activity::{record_mutation, MutationRecord};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::middleware::RequireUsersAdmin;
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    RequireUsersAdmin(_user): RequireUsersAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users
pub async fn create(
    RequireUsersAdmin(actor): RequireUsersAdmin,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let input: CreateUser = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    let email = normalize_email(&input.email);
    if UserRepo::email_in_use(&state.pool, &email, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let new_user = NewUser {
        name: input.name,
        email,
        password_hash: Some(password_hash),
        image: input.image,
        google_id: None,
        role: input.role.unwrap_or_else(|| Role::EDITOR.to_string()),
    };
    let user = UserRepo::create(&state.pool, &new_user).await?;
    tracing::info!(user_id = %user.id, actor = %actor.user_id, "user created");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "user",
            event: "created",
            item_id: user.id.clone(),
            label: user.name.clone(),
            actor_id: actor.user_id,
            link: Some(format!("/admin/users/{}", user.id)),
        },
    );
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users/id/{id}
pub async fn get_by_id(
    RequireUsersAdmin(_user): RequireUsersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    check_entity_id(&id)?;
    let user = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &id))?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/id/{id}
///
/// `email` and `password` are not declared on the DTO, so attempting to patch
/// them is a 400. Changing your own role away from admin is a 403. A role
/// change revokes the target's refresh sessions: they sign in again and pick
/// up the new role from there.
pub async fn update(
    RequireUsersAdmin(actor): RequireUsersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<UserResponse>> {
    check_entity_id(&id)?;
    let input: UpdateUser = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if id == actor.user_id {
        if let Some(role) = &input.role {
            if role != Role::ADMIN {
                return Err(AppError::Core(CoreError::Forbidden(
                    "You cannot change your own role".into(),
                )));
            }
        }
    }

    let user = UserRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &id))?;
    tracing::info!(user_id = %user.id, actor = %actor.user_id, "user updated");

    if input.role.is_some() {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, &id).await?;
        if revoked > 0 {
            tracing::info!(user_id = %id, revoked, "sessions revoked after role change");
        }
    }

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "user",
            event: "updated",
            item_id: user.id.clone(),
            label: user.name.clone(),
            actor_id: actor.user_id,
            link: Some(format!("/admin/users/{}", user.id)),
        },
    );
    Ok(Json(user.into()))
}

/// DELETE /api/users/id/{id}
pub async fn delete(
    RequireUsersAdmin(actor): RequireUsersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    if id == actor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot delete your own account".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &id))?;

    UserRepo::delete(&state.pool, &id).await?;
    tracing::info!(user_id = %id, actor = %actor.user_id, "user deleted");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "user",
            event: "deleted",
            item_id: id,
            label: user.name,
            actor_id: actor.user_id,
            link: None,
        },
    );
    Ok(Json(json!({"message": "User deleted"})))
}
