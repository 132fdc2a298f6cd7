//! Catalog service
//!
//! Categories, genres and titles. Writes here are admin-only; the
//! router enforces that before a handler runs.

use std::sync::Arc;

use crate::domain::entities::{
    Category, CategoryId, Genre, GenreId, NewCategory, NewGenre, NewTitle, Title, TitleFilter,
    TitleId, TitleUpdate,
};
use crate::domain::ports::{CategoryRepository, GenreRepository, TitleRepository};
use crate::error::{AppError, DomainError};

/// Title fields as submitted, with category and genres given by slug.
///
/// Nullable fields are doubly optional: absent leaves the stored value
/// untouched on update, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    pub name: Option<String>,
    pub year: Option<Option<i16>>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
}

/// Service for the browsable catalog
pub struct CatalogService<CR, GR, TR>
where
    CR: CategoryRepository,
    GR: GenreRepository,
    TR: TitleRepository,
{
    categories: Arc<CR>,
    genres: Arc<GR>,
    titles: Arc<TR>,
}

impl<CR, GR, TR> CatalogService<CR, GR, TR>
where
    CR: CategoryRepository,
    GR: GenreRepository,
    TR: TitleRepository,
{
    pub fn new(categories: Arc<CR>, genres: Arc<GR>, titles: Arc<TR>) -> Self {
        Self {
            categories,
            genres,
            titles,
        }
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.list().await?)
    }

    pub async fn create_category(&self, category: NewCategory) -> Result<Category, AppError> {
        category.validate()?;
        let created = self.categories.create(&category).await?;
        tracing::info!(slug = %created.slug, "Category created");
        Ok(created)
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), AppError> {
        self.categories.delete(slug).await?;
        tracing::info!(slug = %slug, "Category deleted");
        Ok(())
    }

    // Genres

    pub async fn list_genres(&self) -> Result<Vec<Genre>, AppError> {
        Ok(self.genres.list().await?)
    }

    pub async fn create_genre(&self, genre: NewGenre) -> Result<Genre, AppError> {
        genre.validate()?;
        let created = self.genres.create(&genre).await?;
        tracing::info!(slug = %created.slug, "Genre created");
        Ok(created)
    }

    pub async fn delete_genre(&self, slug: &str) -> Result<(), AppError> {
        self.genres.delete(slug).await?;
        tracing::info!(slug = %slug, "Genre deleted");
        Ok(())
    }

    // Titles

    pub async fn list_titles(&self, filter: &TitleFilter) -> Result<Vec<Title>, AppError> {
        Ok(self.titles.list(filter).await?)
    }

    pub async fn get_title(&self, id: &TitleId) -> Result<Title, AppError> {
        self.titles.find_by_id(id).await?.ok_or_else(|| {
            AppError::Domain(DomainError::NotFound(format!("Title not found: {}", id)))
        })
    }

    pub async fn create_title(&self, input: TitleInput) -> Result<Title, AppError> {
        let name = input
            .name
            .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
        let category_id = match input.category.flatten() {
            Some(slug) => Some(self.resolve_category(&slug).await?),
            None => None,
        };
        let genre_ids = match input.genres {
            Some(slugs) => self.resolve_genres(&slugs).await?,
            None => Vec::new(),
        };

        let new_title = NewTitle {
            name,
            year: input.year.flatten(),
            description: input.description.flatten(),
            category_id,
            genre_ids,
        };
        new_title.validate()?;

        let title = self.titles.create(&new_title).await?;
        tracing::info!(title_id = %title.id, name = %title.name, "Title created");
        Ok(title)
    }

    pub async fn update_title(&self, id: &TitleId, input: TitleInput) -> Result<Title, AppError> {
        self.get_title(id).await?;

        let category_id = match input.category {
            Some(Some(slug)) => Some(Some(self.resolve_category(&slug).await?)),
            Some(None) => Some(None),
            None => None,
        };
        let genre_ids = match input.genres {
            Some(slugs) => Some(self.resolve_genres(&slugs).await?),
            None => None,
        };

        let update = TitleUpdate {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        };
        update.validate()?;

        Ok(self.titles.update(id, &update).await?)
    }

    pub async fn delete_title(&self, id: &TitleId) -> Result<(), AppError> {
        self.get_title(id).await?;
        self.titles.delete(id).await?;
        tracing::info!(title_id = %id, "Title deleted");
        Ok(())
    }

    async fn resolve_category(&self, slug: &str) -> Result<CategoryId, AppError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", slug)))
    }

    async fn resolve_genres(&self, slugs: &[String]) -> Result<Vec<GenreId>, AppError> {
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = self
                .genres
                .find_by_slug(slug)
                .await?
                .ok_or_else(|| AppError::BadRequest(format!("Unknown genre: {}", slug)))?;
            if !ids.contains(&genre.id) {
                ids.push(genre.id);
            }
        }
        Ok(ids)
    }
}
