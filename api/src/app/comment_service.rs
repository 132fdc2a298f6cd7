//! Comment service
//!
//! Comments hang off a review, which in turn hangs off a title. Both
//! parents are checked on every call so a comment is never reachable
//! through the wrong path.

use std::sync::Arc;

use crate::app::access::ensure;
use crate::domain::entities::{
    Actor, Comment, CommentId, NewComment, Review, ReviewId, TitleId,
};
use crate::domain::entities::review::validate_text;
use crate::domain::policy::{Action, Gate};
use crate::domain::ports::{CommentRepository, ReviewRepository};
use crate::error::{AppError, DomainError};

/// Service for comments on reviews
pub struct CommentService<CR, RR>
where
    CR: CommentRepository,
    RR: ReviewRepository,
{
    comments: Arc<CR>,
    reviews: Arc<RR>,
}

impl<CR, RR> CommentService<CR, RR>
where
    CR: CommentRepository,
    RR: ReviewRepository,
{
    pub fn new(comments: Arc<CR>, reviews: Arc<RR>) -> Self {
        Self { comments, reviews }
    }

    pub async fn list(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, AppError> {
        self.require_review(title_id, review_id).await?;
        Ok(self.comments.find_by_review(review_id).await?)
    }

    pub async fn get(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> Result<Comment, AppError> {
        self.require_review(title_id, review_id).await?;
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.review_id == *review_id)
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!(
                    "Comment not found: {}",
                    comment_id
                )))
            })
    }

    pub async fn create(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        text: String,
    ) -> Result<Comment, AppError> {
        ensure(actor, Action::Create, Gate::AuthorOrStaff, None)?;
        let author_id = actor.user_id().ok_or(AppError::Unauthorized)?;

        self.require_review(title_id, review_id).await?;

        let new_comment = NewComment {
            review_id: *review_id,
            author_id,
            text,
        };
        new_comment.validate()?;

        let comment = self.comments.create(&new_comment).await?;
        tracing::info!(comment_id = %comment.id, review_id = %review_id, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
        text: String,
    ) -> Result<Comment, AppError> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        ensure(actor, Action::Update, Gate::AuthorOrStaff, Some(&comment))?;
        validate_text(&text)?;

        Ok(self.comments.update_text(comment_id, &text).await?)
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> Result<(), AppError> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        ensure(actor, Action::Delete, Gate::AuthorOrStaff, Some(&comment))?;

        self.comments.delete(comment_id).await?;
        tracing::info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    async fn require_review(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> Result<Review, AppError> {
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
}
