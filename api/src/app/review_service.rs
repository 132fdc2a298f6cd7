//! Review service
//!
//! Review CRUD nested under a title. Every write is two-phase: persist
//! the review, then recompute the title rating.

use std::sync::Arc;

use crate::app::access::ensure;
use crate::app::rating_service::RatingService;
use crate::domain::entities::{
    Actor, NewReview, Review, ReviewId, ReviewUpdate, Score, TitleId,
};
use crate::domain::policy::{Action, Gate};
use crate::domain::ports::{ReviewRepository, TitleRepository};
use crate::error::{AppError, DomainError};

/// Service for reviews and the rating side effects of writing them
pub struct ReviewService<RR, TR>
where
    RR: ReviewRepository,
    TR: TitleRepository,
{
    reviews: Arc<RR>,
    titles: Arc<TR>,
    rating: RatingService<RR, TR>,
}

impl<RR, TR> ReviewService<RR, TR>
where
    RR: ReviewRepository,
    TR: TitleRepository,
{
    pub fn new(reviews: Arc<RR>, titles: Arc<TR>) -> Self {
        let rating = RatingService::new(reviews.clone(), titles.clone());
        Self {
            reviews,
            titles,
            rating,
        }
    }

    /// List a title's reviews
    pub async fn list(&self, title_id: &TitleId) -> Result<Vec<Review>, AppError> {
        self.require_title(title_id).await?;
        Ok(self.reviews.find_by_title(title_id).await?)
    }

    /// Get a single review, which must belong to `title_id`
    pub async fn get(&self, title_id: &TitleId, review_id: &ReviewId) -> Result<Review, AppError> {
        self.reviews
            .find_by_id(review_id)
            .await?
            .filter(|r| r.title_id == *title_id)
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!(
                    "Review not found: {}",
                    review_id
                )))
            })
    }

    /// Write a review as `actor` and refresh the title rating
    pub async fn create(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        text: String,
        score: Score,
    ) -> Result<Review, AppError> {
        ensure(actor, Action::Create, Gate::AuthorOrStaff, None)?;
        let author_id = actor.user_id().ok_or(AppError::Unauthorized)?;

        self.require_title(title_id).await?;

        let new_review = NewReview {
            title_id: *title_id,
            author_id,
            text,
            score,
        };
        new_review.validate()?;

        let review = self.reviews.create(&new_review).await?;
        tracing::info!(
            review_id = %review.id,
            title_id = %title_id,
            author_id = %author_id,
            score = %review.score,
            "Review created"
        );

        self.rating.on_review_saved(&review).await?;
        Ok(review)
    }

    /// Edit a review. Allowed for its author, moderators and admins.
    pub async fn update(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, AppError> {
        let review = self.get(title_id, review_id).await?;
        ensure(actor, Action::Update, Gate::AuthorOrStaff, Some(&review))?;
        update.validate()?;

        let review = self.reviews.update(review_id, &update).await?;
        tracing::info!(review_id = %review.id, score = %review.score, "Review updated");

        self.rating.on_review_saved(&review).await?;
        Ok(review)
    }

    /// Delete a review and its comments. Allowed for its author, moderators and admins.
    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> Result<(), AppError> {
        let review = self.get(title_id, review_id).await?;
        ensure(actor, Action::Delete, Gate::AuthorOrStaff, Some(&review))?;

        self.reviews.delete(review_id).await?;
        tracing::info!(review_id = %review_id, title_id = %title_id, "Review deleted");

        self.rating.on_review_deleted(title_id).await?;
        Ok(())
    }

    async fn require_title(&self, title_id: &TitleId) -> Result<(), AppError> {
        if self.titles.find_by_id(title_id).await?.is_none() {
            return Err(AppError::Domain(DomainError::NotFound(format!(
                "Title not found: {}",
                title_id
            ))));
        }
        Ok(())
    }
}
