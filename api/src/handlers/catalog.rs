//! Category and genre handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::domain::entities::{Category, Genre, NewCategory, NewGenre};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a category or genre
#[derive(Debug, Deserialize)]
pub struct CatalogEntryRequest {
    pub name: String,
    pub slug: String,
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.catalog_service.list_categories().await?))
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CatalogEntryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state
        .catalog_service
        .create_category(NewCategory {
            name: request.name,
            slug: request.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /categories/:slug
pub async fn delete_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /genres
pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Vec<Genre>>, AppError> {
    Ok(Json(state.catalog_service.list_genres().await?))
}

/// POST /genres
pub async fn create_genre(
    State(state): State<AppState>,
    Json(request): Json<CatalogEntryRequest>,
) -> Result<(StatusCode, Json<Genre>), AppError> {
    let genre = state
        .catalog_service
        .create_genre(NewGenre {
            name: request.name,
            slug: request.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /genres/:slug
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete_genre(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
