//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::validate::normalize_email;
use backlot_db::models::user::{User, UserResponse};
use backlot_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_opaque_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_body;
use crate::middleware::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. OAuth-only accounts (no stored
/// password hash) cannot log in this way and get the same 401 as a wrong
/// password.
pub async fn login(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<AuthResponse>> {
    let input: LoginRequest = parse_body(raw)?;
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
    })?;

    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, &user.id).await?;
    tracing::info!(user_id = %user.id, "login succeeded");

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for a new access + refresh pair. The old
/// session is revoked (token rotation).
pub async fn refresh(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<AuthResponse>> {
    let input: RefreshRequest = parse_body(raw)?;
    let token_hash = hash_opaque_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, &session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, &session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke the session matching the provided refresh token. Succeeds even for
/// unknown tokens so logout is idempotent.
pub async fn logout(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    let input: RefreshRequest = parse_body(raw)?;
    let token_hash = hash_opaque_token(&input.refresh_token);

    if let Some(session) = SessionRepo::find_active_by_hash(&state.pool, &token_hash).await? {
        SessionRepo::revoke(&state.pool, &session.id).await?;
    }
    Ok(Json(json!({"message": "Logged out"})))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let record = UserRepo::find_by_id(&state.pool, &user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(record.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(&user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_opaque_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, &user.id, &refresh_hash, expires_at).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: user.into(),
    })
}
