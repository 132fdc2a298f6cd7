//! Comment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::domain::entities::{Actor, Comment, CommentId, ReviewId, TitleId};
use crate::error::AppError;
use crate::AppState;

/// Request body for writing or editing a comment
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// GET /titles/:id/reviews/:review_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(TitleId, ReviewId)>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(
        state.comment_service.list(&title_id, &review_id).await?,
    ))
}

/// GET /titles/:id/reviews/:review_id/comments/:comment_id
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(TitleId, ReviewId, CommentId)>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(
        state
            .comment_service
            .get(&title_id, &review_id, &comment_id)
            .await?,
    ))
}

/// POST /titles/:id/reviews/:review_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(TitleId, ReviewId)>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = state
        .comment_service
        .create(&actor, &title_id, &review_id, request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /titles/:id/reviews/:review_id/comments/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id, comment_id)): Path<(TitleId, ReviewId, CommentId)>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(
        state
            .comment_service
            .update(&actor, &title_id, &review_id, &comment_id, request.text)
            .await?,
    ))
}

/// DELETE /titles/:id/reviews/:review_id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id, comment_id)): Path<(TitleId, ReviewId, CommentId)>,
) -> Result<StatusCode, AppError> {
    state
        .comment_service
        .delete(&actor, &title_id, &review_id, &comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
