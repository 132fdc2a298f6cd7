//! User handlers
//!
//! Signup, the caller's own profile and admin user management.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Actor, User, UserUpdate};
use crate::error::AppError;
use crate::AppState;

/// Request body for signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Response body for signup
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
    /// API key for later calls (Authorization: Bearer <api_key>). Shown once.
    pub api_key: String,
}

/// POST /auth/signup
///
/// Register a new user and issue their API key.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let (user, api_key) = state
        .user_service
        .signup(&request.username, &request.email)
        .await?;

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
        api_key,
    }))
}

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<User>, AppError> {
    let user_id = actor.user_id().ok_or(AppError::Unauthorized)?;
    Ok(Json(state.user_service.get(&user_id).await?))
}

/// PATCH /users/me
///
/// Only the bio is writable here; role and staff flag are dropped.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    let user_id = actor.user_id().ok_or(AppError::Unauthorized)?;
    Ok(Json(state.user_service.update_me(&user_id, update).await?))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.user_service.list().await?))
}

/// PATCH /users/:username
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        state.user_service.update_user(&username, update).await?,
    ))
}
