/// User endpoints
///
/// # Endpoints
///
/// - `POST /user/register` - Create an account (public)
/// - `POST /user/login` - Exchange credentials for a bearer token (public)
/// - `POST /user/logout` - Invalidate the current token
/// - `GET /user/me` - Current user profile
/// - `POST /user/changePassword` - Validate and rotate the credential

use crate::{
    app::AppState,
    error::{ok, ok_empty, ApiError, ApiResult, Envelope},
    extract::Json,
    routes::validation_error,
};
use axum::{extract::State, http::StatusCode, Extension};
use notehub_shared::{
    auth::{
        password::{hash_password, verify_password},
        token::generate_token,
    },
    models::user::{CreateUser, Role, User},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub password: String,
}

/// Register response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub id: Uuid,
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Login response payload
#[derive(Debug, Serialize)]
pub struct LoginData {
    /// Fresh opaque bearer token
    pub token: String,
}

/// Current-user payload
#[derive(Debug, Serialize)]
pub struct MeData {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Registers a new user
///
/// Always creates a plain `user` role account. Returns 201 on success,
/// 400 for missing fields or a duplicate username.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<RegisterData>>)> {
    req.validate().map_err(validation_error)?;

    let password_hash = hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            role: Role::User,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        ok(RegisterData {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Logs a user in and issues a fresh bearer token
///
/// A missing user and a failed password check are separate code paths
/// that return the identical 401 envelope, so a caller cannot discover
/// which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<LoginData>>> {
    let user = match User::find_by_username(&state.db, &req.username).await? {
        Some(user) => user,
        None => {
            return Err(ApiError::Unauthenticated(
                "Invalid username or password".to_string(),
            ))
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthenticated(
            "Invalid username or password".to_string(),
        ));
    }

    let token = generate_token();
    User::set_token(&state.db, user.id, Some(&token)).await?;

    Ok(ok(LoginData { token }))
}

/// Logs the current user out
///
/// Clears the session token. Idempotent; logging out twice with the same
/// token fails only because the first call already invalidated it.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Envelope<Value>>> {
    User::set_token(&state.db, user.id, None).await?;

    Ok(ok_empty())
}

/// Returns the current user's profile
pub async fn me(Extension(user): Extension<User>) -> ApiResult<Json<Envelope<MeData>>> {
    Ok(ok(MeData {
        id: user.id,
        username: user.username,
        role: user.role,
    }))
}

/// Changes the current user's password
///
/// The validation chain runs in a fixed order, first failure wins, each
/// with its own 400 message: old missing, new missing, new too short,
/// new equal to old, old incorrect.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let old_password = req.old_password.as_deref().unwrap_or("");
    let new_password = req.new_password.as_deref().unwrap_or("");

    if old_password.is_empty() {
        return Err(ApiError::Validation(
            "Old password must not be empty".to_string(),
        ));
    }

    if new_password.is_empty() {
        return Err(ApiError::Validation(
            "New password must not be empty".to_string(),
        ));
    }

    // Character count, not byte length: a short multi-byte password must
    // not slip past the minimum.
    if new_password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "New password must be at least 6 characters".to_string(),
        ));
    }

    if old_password == new_password {
        return Err(ApiError::Validation(
            "New password must differ from the old password".to_string(),
        ));
    }

    if !verify_password(old_password, &user.password_hash)? {
        return Err(ApiError::Validation("Old password incorrect".to_string()));
    }

    let password_hash = hash_password(new_password)?;
    User::set_password_hash(&state.db, user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Password changed");

    Ok(ok_empty())
}
