//! PostgreSQL adapter for CommentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{update_err, write_err};
use crate::domain::entities::{Comment, CommentId, NewComment, ReviewId, UserId};
use crate::domain::ports::CommentRepository;
use crate::entity::comments;
use crate::error::DomainError;

/// PostgreSQL implementation of CommentRepository
pub struct PostgresCommentRepository {
    db: DatabaseConnection,
}

impl PostgresCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        let result = comments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_review(&self, review_id: &ReviewId) -> Result<Vec<Comment>, DomainError> {
        let results = comments::Entity::find()
            .filter(comments::Column::ReviewId.eq(review_id.0))
            .order_by_asc(comments::Column::PubDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let model = comments::ActiveModel {
            id: Set(Uuid::new_v4()),
            review_id: Set(comment.review_id.0),
            author_id: Set(comment.author_id.0),
            text: Set(comment.text.clone()),
            pub_date: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(write_err)?;

        Ok(result.into())
    }

    async fn update_text(&self, id: &CommentId, text: &str) -> Result<Comment, DomainError> {
        let model = comments::ActiveModel {
            id: Set(id.0),
            text: Set(text.to_string()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_err("Comment", id, e))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), DomainError> {
        let result = comments::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Comment not found: {}", id)));
        }
        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<comments::Model> for Comment {
    fn from(model: comments::Model) -> Self {
        Comment {
            id: CommentId(model.id),
            review_id: ReviewId(model.review_id),
            author_id: UserId(model.author_id),
            text: model.text,
            pub_date: model.pub_date.with_timezone(&Utc),
        }
    }
}
