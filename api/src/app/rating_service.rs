//! Rating service
//!
//! Keeps `Title::rating` equal to the mean score of the title's reviews.
//! This is the only writer of the rating.
//!
//! Recomputation runs after the review write has already been persisted
//! and is not atomic with it: a failure here leaves the review saved and
//! the rating stale, and two concurrent review writes on the same title
//! may interleave their aggregate reads. Running it again always
//! converges, since the result depends only on the current review set.

use std::sync::Arc;

use crate::domain::entities::{Review, TitleId};
use crate::domain::ports::{ReviewRepository, TitleRepository};
use crate::error::AppError;

/// Service recomputing title ratings from reviews
pub struct RatingService<RR, TR>
where
    RR: ReviewRepository,
    TR: TitleRepository,
{
    reviews: Arc<RR>,
    titles: Arc<TR>,
}

impl<RR, TR> RatingService<RR, TR>
where
    RR: ReviewRepository,
    TR: TitleRepository,
{
    pub fn new(reviews: Arc<RR>, titles: Arc<TR>) -> Self {
        Self { reviews, titles }
    }

    /// Called after a review has been created or updated
    pub async fn on_review_saved(&self, review: &Review) -> Result<Option<f64>, AppError> {
        self.recompute(&review.title_id).await
    }

    /// Called after a review has been deleted
    pub async fn on_review_deleted(&self, title_id: &TitleId) -> Result<Option<f64>, AppError> {
        self.recompute(title_id).await
    }

    /// Aggregate the scores of `title_id` and persist the mean.
    ///
    /// With no reviews left the rating is cleared rather than treated as
    /// an error. Store failures propagate unchanged.
    pub async fn recompute(&self, title_id: &TitleId) -> Result<Option<f64>, AppError> {
        let rating = self.reviews.average_score(title_id).await?;
        self.titles.update_rating(title_id, rating).await?;

        tracing::info!(title_id = %title_id, rating = ?rating, "Title rating recomputed");

        Ok(rating)
    }
}
