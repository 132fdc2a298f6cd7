//! Title domain entity
//!
//! A title is the reviewable work. Its `rating` is derived from its
//! reviews and is written only by the rating service.

use serde::{Deserialize, Serialize};

use super::catalog::{validate_name, Category, CategoryId, Genre, GenreId};
use crate::error::DomainError;

uuid_id!(
    /// Unique identifier for a title
    TitleId
);

pub const TITLE_NAME_MAX: usize = 250;
pub const DESCRIPTION_MAX: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    /// Mean review score, `None` while the title has no reviews
    pub rating: Option<f64>,
}

/// Data needed to create a new title, with category and genres already resolved
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub genre_ids: Vec<GenreId>,
}

impl NewTitle {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name("name", &self.name, TITLE_NAME_MAX)?;
        validate_year(self.year)?;
        validate_description(self.description.as_deref())
    }
}

/// Partial update of a title. `rating` is deliberately absent.
///
/// For the nullable fields the outer `None` leaves the value alone and
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TitleUpdate {
    pub name: Option<String>,
    pub year: Option<Option<i16>>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<CategoryId>>,
    pub genre_ids: Option<Vec<GenreId>>,
}

impl TitleUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name("name", name, TITLE_NAME_MAX)?;
        }
        validate_year(self.year.flatten())?;
        validate_description(self.description.as_ref().and_then(Option::as_deref))
    }
}

/// Filters accepted by the title listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub year: Option<i16>,
}

impl TitleFilter {
    pub fn matches(&self, title: &Title) -> bool {
        if let Some(slug) = &self.category {
            if title.category.as_ref().map(|c| &c.slug) != Some(slug) {
                return false;
            }
        }
        if let Some(slug) = &self.genre {
            if !title.genres.iter().any(|g| &g.slug == slug) {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !title.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if title.year != Some(year) {
                return false;
            }
        }
        true
    }
}

fn validate_year(year: Option<i16>) -> Result<(), DomainError> {
    match year {
        Some(y) if y < 0 => Err(DomainError::Validation(
            "year must not be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_description(description: Option<&str>) -> Result<(), DomainError> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX => Err(DomainError::Validation(format!(
            "description must be at most {} characters",
            DESCRIPTION_MAX
        ))),
        _ => Ok(()),
    }
}
