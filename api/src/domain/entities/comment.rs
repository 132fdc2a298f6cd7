//! Comment domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::review::{validate_text, ReviewId};
use super::user::UserId;
use crate::domain::policy::Authored;
use crate::error::DomainError;

uuid_id!(
    /// Unique identifier for a comment
    CommentId
);

/// A remark on a review. Comments never affect ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub review_id: ReviewId,
    pub author_id: UserId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: ReviewId,
    pub author_id: UserId,
    pub text: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_text(&self.text)
    }
}
