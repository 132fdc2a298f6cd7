//! Review handlers
//!
//! Every write here triggers a rating recompute for the parent title.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::domain::entities::{Actor, Review, ReviewId, ReviewUpdate, Score, TitleId};
use crate::error::AppError;
use crate::AppState;

/// Request body for writing a review
///
/// `score` is taken as a plain integer and range-checked after
/// extraction, so an out-of-range value is a 400 with a JSON body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

impl CreateReviewRequest {
    pub fn into_parts(self) -> Result<(String, Score), AppError> {
        Ok((self.text, Score::try_from(self.score)?))
    }
}

/// Request body for editing a review
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

impl TryFrom<UpdateReviewRequest> for ReviewUpdate {
    type Error = AppError;

    fn try_from(request: UpdateReviewRequest) -> Result<Self, Self::Error> {
        Ok(ReviewUpdate {
            text: request.text,
            score: request.score.map(Score::try_from).transpose()?,
        })
    }
}

/// GET /titles/:id/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<TitleId>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.review_service.list(&title_id).await?))
}

/// GET /titles/:id/reviews/:review_id
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(TitleId, ReviewId)>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.review_service.get(&title_id, &review_id).await?))
}

/// POST /titles/:id/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(title_id): Path<TitleId>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let (text, score) = request.into_parts()?;
    let review = state
        .review_service
        .create(&actor, &title_id, text, score)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /titles/:id/reviews/:review_id
pub async fn update_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(TitleId, ReviewId)>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    let update = ReviewUpdate::try_from(request)?;
    Ok(Json(
        state
            .review_service
            .update(&actor, &title_id, &review_id, update)
            .await?,
    ))
}

/// DELETE /titles/:id/reviews/:review_id
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(TitleId, ReviewId)>,
) -> Result<StatusCode, AppError> {
    state
        .review_service
        .delete(&actor, &title_id, &review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
