//! Title handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer};

use crate::app::TitleInput;
use crate::domain::entities::{Title, TitleFilter, TitleId};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating or editing a title.
///
/// Category and genres are given by slug. `rating` is not accepted.
/// An explicit `null` for `year`, `description` or `category` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Option<i16>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

/// Distinguishes a field sent as `null` from one left out.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<TitleRequest> for TitleInput {
    fn from(request: TitleRequest) -> Self {
        TitleInput {
            name: request.name,
            year: request.year,
            description: request.description,
            category: request.category,
            genres: request.genre,
        }
    }
}

/// GET /titles?category=&genre=&name=&year=
pub async fn list_titles(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> Result<Json<Vec<Title>>, AppError> {
    Ok(Json(state.catalog_service.list_titles(&filter).await?))
}

/// GET /titles/:id
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<TitleId>,
) -> Result<Json<Title>, AppError> {
    Ok(Json(state.catalog_service.get_title(&id).await?))
}

/// POST /titles
pub async fn create_title(
    State(state): State<AppState>,
    Json(request): Json<TitleRequest>,
) -> Result<(StatusCode, Json<Title>), AppError> {
    let title = state.catalog_service.create_title(request.into()).await?;
    Ok((StatusCode::CREATED, Json(title)))
}

/// PATCH /titles/:id
pub async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<TitleId>,
    Json(request): Json<TitleRequest>,
) -> Result<Json<Title>, AppError> {
    Ok(Json(
        state
            .catalog_service
            .update_title(&id, request.into())
            .await?,
    ))
}

/// DELETE /titles/:id
pub async fn delete_title(
    State(state): State<AppState>,
    Path(id): Path<TitleId>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete_title(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
