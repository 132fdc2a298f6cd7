//! PostgreSQL adapter for ReviewRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{update_err, write_err};
use crate::domain::entities::{NewReview, Review, ReviewId, ReviewUpdate, Score, TitleId, UserId};
use crate::domain::ports::ReviewRepository;
use crate::entity::reviews;
use crate::error::DomainError;

/// PostgreSQL implementation of ReviewRepository
pub struct PostgresReviewRepository {
    db: DatabaseConnection,
}

impl PostgresReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let result = reviews::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Review::try_from).transpose()
    }

    async fn find_by_title(&self, title_id: &TitleId) -> Result<Vec<Review>, DomainError> {
        let results = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id.0))
            .order_by_desc(reviews::Column::PubDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Review::try_from).collect()
    }

    async fn create(&self, review: &NewReview) -> Result<Review, DomainError> {
        let model = reviews::ActiveModel {
            id: Set(Uuid::new_v4()),
            title_id: Set(review.title_id.0),
            author_id: Set(review.author_id.0),
            text: Set(review.text.clone()),
            score: Set(review.score.value()),
            pub_date: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(write_err)?;

        Review::try_from(result)
    }

    async fn update(&self, id: &ReviewId, update: &ReviewUpdate) -> Result<Review, DomainError> {
        if update.text.is_none() && update.score.is_none() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("Review not found: {}", id)));
        }

        let mut model = reviews::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        if let Some(text) = &update.text {
            model.text = Set(text.clone());
        }
        if let Some(score) = update.score {
            model.score = Set(score.value());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_err("Review", id, e))?;

        Review::try_from(result)
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError> {
        // comments cascade
        let result = reviews::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Review not found: {}", id)));
        }
        Ok(())
    }

    async fn average_score(&self, title_id: &TitleId) -> Result<Option<f64>, DomainError> {
        // AVG over a smallint is numeric in Postgres; cast so it decodes as f64
        let avg = SimpleExpr::from(Func::cast_as(
            Func::avg(Expr::col(reviews::Column::Score)),
            Alias::new("float8"),
        ));

        let result = reviews::Entity::find()
            .select_only()
            .column_as(avg, "avg_score")
            .filter(reviews::Column::TitleId.eq(title_id.0))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.flatten())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<reviews::Model> for Review {
    type Error = DomainError;

    fn try_from(model: reviews::Model) -> Result<Self, Self::Error> {
        Ok(Review {
            id: ReviewId(model.id),
            title_id: TitleId(model.title_id),
            author_id: UserId(model.author_id),
            text: model.text,
            score: Score::try_from(model.score)?,
            pub_date: model.pub_date.with_timezone(&Utc),
        })
    }
}
