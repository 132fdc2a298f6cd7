//! Category and genre domain entities
//!
//! Both are slug-addressed classifiers attached to titles. A title has
//! at most one category and any number of genres.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DomainError;

uuid_id!(
    /// Unique identifier for a category
    CategoryId
);

uuid_id!(
    /// Unique identifier for a genre
    GenreId
);

pub const CATEGORY_NAME_MAX: usize = 300;
pub const GENRE_NAME_MAX: usize = 250;
pub const SLUG_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(skip_serializing)]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name("name", &self.name, CATEGORY_NAME_MAX)?;
        validate_slug(&self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    #[serde(skip_serializing)]
    pub id: GenreId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewGenre {
    pub name: String,
    pub slug: String,
}

impl NewGenre {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name("name", &self.name, GENRE_NAME_MAX)?;
        validate_slug(&self.slug)
    }
}

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap())
}

/// Slugs are non-empty, at most 50 chars, ASCII letters, digits, `-` and `_`
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.len() > SLUG_MAX || !slug_pattern().is_match(slug) {
        return Err(DomainError::Validation(format!(
            "Invalid slug '{}': use 1-{} letters, digits, '-' or '_'",
            slug, SLUG_MAX
        )));
    }
    Ok(())
}

/// Non-blank and at most `max` characters
pub fn validate_name(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
