//! PostgreSQL adapters for CategoryRepository and GenreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::write_err;
use crate::domain::entities::{Category, CategoryId, Genre, GenreId, NewCategory, NewGenre};
use crate::domain::ports::{CategoryRepository, GenreRepository};
use crate::entity::{categories, genres};
use crate::error::DomainError;

/// PostgreSQL implementation of CategoryRepository
pub struct PostgresCategoryRepository {
    db: DatabaseConnection,
}

impl PostgresCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let results = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let result = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let model = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(category.name.clone()),
            slug: Set(category.slug.clone()),
        };

        let result = model.insert(&self.db).await.map_err(write_err)?;

        Ok(result.into())
    }

    async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        // titles.category_id is ON DELETE SET NULL
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Category not found: {}", slug)));
        }
        Ok(())
    }
}

/// PostgreSQL implementation of GenreRepository
pub struct PostgresGenreRepository {
    db: DatabaseConnection,
}

impl PostgresGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for PostgresGenreRepository {
    async fn list(&self) -> Result<Vec<Genre>, DomainError> {
        let results = genres::Entity::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError> {
        let result = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, genre: &NewGenre) -> Result<Genre, DomainError> {
        let model = genres::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(genre.name.clone()),
            slug: Set(genre.slug.clone()),
        };

        let result = model.insert(&self.db).await.map_err(write_err)?;

        Ok(result.into())
    }

    async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        // title_genres rows cascade
        let result = genres::Entity::delete_many()
            .filter(genres::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Genre not found: {}", slug)));
        }
        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Category {
            id: CategoryId(model.id),
            name: model.name,
            slug: model.slug,
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<genres::Model> for Genre {
    fn from(model: genres::Model) -> Self {
        Genre {
            id: GenreId(model.id),
            name: model.name,
            slug: model.slug,
        }
    }
}
