//! PostgreSQL adapter for TitleRepository
//!
//! Titles are stored flat; category and genres are loaded with one
//! extra query each per batch and stitched together here.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{update_err, write_err};
use crate::domain::entities::{
    Category, Genre, GenreId, NewTitle, Title, TitleFilter, TitleId, TitleUpdate,
};
use crate::domain::ports::TitleRepository;
use crate::entity::{categories, genres, title_genres, titles};
use crate::error::DomainError;

/// PostgreSQL implementation of TitleRepository
pub struct PostgresTitleRepository {
    db: DatabaseConnection,
}

impl PostgresTitleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Attach categories and genres to a batch of title rows, preserving order
async fn load<C>(conn: &C, models: Vec<titles::Model>) -> Result<Vec<Title>, DbErr>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
    let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        categories::Entity::find()
            .filter(categories::Column::Id.is_in(category_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, Category::from(m)))
            .collect()
    };

    let title_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let links = title_genres::Entity::find()
        .filter(title_genres::Column::TitleId.is_in(title_ids))
        .all(conn)
        .await?;

    let genres: HashMap<Uuid, Genre> = if links.is_empty() {
        HashMap::new()
    } else {
        genres::Entity::find()
            .filter(genres::Column::Id.is_in(links.iter().map(|l| l.genre_id)))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, Genre::from(m)))
            .collect()
    };

    let mut genres_by_title: HashMap<Uuid, Vec<Genre>> = HashMap::new();
    for link in links {
        if let Some(genre) = genres.get(&link.genre_id) {
            genres_by_title
                .entry(link.title_id)
                .or_default()
                .push(genre.clone());
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let mut linked = genres_by_title.remove(&m.id).unwrap_or_default();
            linked.sort_by(|a, b| a.name.cmp(&b.name));
            Title {
                id: TitleId(m.id),
                name: m.name,
                year: m.year,
                description: m.description,
                category: m.category_id.and_then(|id| categories.get(&id).cloned()),
                genres: linked,
                rating: m.rating,
            }
        })
        .collect())
}

/// `%needle%` with `%`, `_` and `\\` in the needle matched literally
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn link_genres<C>(conn: &C, title_id: Uuid, genre_ids: &[GenreId]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if genre_ids.is_empty() {
        return Ok(());
    }
    let links = genre_ids.iter().map(|g| title_genres::ActiveModel {
        title_id: Set(title_id),
        genre_id: Set(g.0),
    });
    title_genres::Entity::insert_many(links).exec(conn).await?;
    Ok(())
}

#[async_trait]
impl TitleRepository for PostgresTitleRepository {
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError> {
        let result = titles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let Some(model) = result else {
            return Ok(None);
        };
        let mut loaded = load(&self.db, vec![model])
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(loaded.pop())
    }

    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, DomainError> {
        let mut query = titles::Entity::find();

        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }
        if let Some(name) = &filter.name {
            let pattern = LikeExpr::new(contains_pattern(&name.to_lowercase())).escape('\\');
            query = query
                .filter(Expr::expr(Func::lower(Expr::col(titles::Column::Name))).like(pattern));
        }
        if let Some(slug) = &filter.category {
            let category = categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug.as_str()))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            let Some(category) = category else {
                return Ok(Vec::new());
            };
            query = query.filter(titles::Column::CategoryId.eq(category.id));
        }
        if let Some(slug) = &filter.genre {
            let genre = genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug.as_str()))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            let Some(genre) = genre else {
                return Ok(Vec::new());
            };
            let title_ids: Vec<Uuid> = title_genres::Entity::find()
                .filter(title_genres::Column::GenreId.eq(genre.id))
                .all(&self.db)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?
                .into_iter()
                .map(|l| l.title_id)
                .collect();
            if title_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(titles::Column::Id.is_in(title_ids));
        }

        let models = query
            .order_by_asc(titles::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        load(&self.db, models)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn create(&self, title: &NewTitle) -> Result<Title, DomainError> {
        let id = Uuid::new_v4();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        titles::ActiveModel {
            id: Set(id),
            name: Set(title.name.clone()),
            year: Set(title.year),
            description: Set(title.description.clone()),
            category_id: Set(title.category_id.map(|c| c.0)),
            rating: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(write_err)?;

        link_genres(&txn, id, &title.genre_ids)
            .await
            .map_err(write_err)?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.find_by_id(&TitleId(id))
            .await?
            .ok_or_else(|| DomainError::Internal(format!("Title vanished after insert: {}", id)))
    }

    async fn update(&self, id: &TitleId, update: &TitleUpdate) -> Result<Title, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut model = titles::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        let mut changed = false;
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
            changed = true;
        }
        if let Some(year) = update.year {
            model.year = Set(year);
            changed = true;
        }
        if let Some(description) = &update.description {
            model.description = Set(description.clone());
            changed = true;
        }
        if let Some(category_id) = update.category_id {
            model.category_id = Set(category_id.map(|c| c.0));
            changed = true;
        }
        if changed {
            model
                .update(&txn)
                .await
                .map_err(|e| update_err("Title", id, e))?;
        }

        if let Some(genre_ids) = &update.genre_ids {
            title_genres::Entity::delete_many()
                .filter(title_genres::Column::TitleId.eq(id.0))
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            link_genres(&txn, id.0, genre_ids)
                .await
                .map_err(write_err)?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Title not found: {}", id)))
    }

    async fn delete(&self, id: &TitleId) -> Result<(), DomainError> {
        // reviews, their comments and title_genres rows cascade
        let result = titles::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Title not found: {}", id)));
        }
        Ok(())
    }

    async fn update_rating(&self, id: &TitleId, rating: Option<f64>) -> Result<(), DomainError> {
        let result = titles::Entity::update_many()
            .col_expr(titles::Column::Rating, Expr::value(rating))
            .filter(titles::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Title not found: {}", id)));
        }
        Ok(())
    }
}
