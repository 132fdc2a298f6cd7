//! Review domain entity
//!
//! A user's scored opinion of a title. Saving or deleting a review
//! changes the title's rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::title::TitleId;
use super::user::UserId;
use crate::domain::policy::Authored;
use crate::error::DomainError;

uuid_id!(
    /// Unique identifier for a review
    ReviewId
);

pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

/// A review score, always within `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(i16);

impl Score {
    pub fn value(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Score {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (SCORE_MIN..=SCORE_MAX).contains(&value) {
            Ok(Score(value))
        } else {
            Err(DomainError::Validation(format!(
                "score must be between {} and {}, got {}",
                SCORE_MIN, SCORE_MAX, value
            )))
        }
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub title_id: TitleId,
    pub author_id: UserId,
    pub text: String,
    pub score: Score,
    pub pub_date: DateTime<Utc>,
}

impl Authored for Review {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: TitleId,
    pub author_id: UserId,
    pub text: String,
    pub score: Score,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_text(&self.text)
    }
}

/// Partial update of a review. Title, author and `pub_date` never change.
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub text: Option<String>,
    pub score: Option<Score>,
}

impl ReviewUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.text {
            Some(text) => validate_text(text),
            None => Ok(()),
        }
    }
}

/// Review and comment bodies must contain something other than whitespace
pub fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation("text must not be empty".to_string()));
    }
    Ok(())
}

/// Arithmetic mean of a set of scores, `None` when there are none
pub fn mean_score<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = Score>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0i64, 0i64), |(sum, count), s| (sum + i64::from(s.0), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
