//! YaMDb API Server
//!
//! Reviews and ratings for a catalog of titles (films, books, music).
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod routes;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresGenreRepository,
    PostgresReviewRepository, PostgresTitleRepository, PostgresUserRepository,
};
use app::{CatalogService, CommentService, ReviewService, UserService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub catalog_service: Arc<
        CatalogService<PostgresCategoryRepository, PostgresGenreRepository, PostgresTitleRepository>,
    >,
    pub review_service: Arc<ReviewService<PostgresReviewRepository, PostgresTitleRepository>>,
    pub comment_service: Arc<CommentService<PostgresCommentRepository, PostgresReviewRepository>>,
}

impl AppState {
    /// Wire the Postgres adapters into the application services
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
        let category_repo = Arc::new(PostgresCategoryRepository::new(db.clone()));
        let genre_repo = Arc::new(PostgresGenreRepository::new(db.clone()));
        let title_repo = Arc::new(PostgresTitleRepository::new(db.clone()));
        let review_repo = Arc::new(PostgresReviewRepository::new(db.clone()));
        let comment_repo = Arc::new(PostgresCommentRepository::new(db));

        Self {
            user_service: Arc::new(UserService::new(user_repo)),
            catalog_service: Arc::new(CatalogService::new(
                category_repo,
                genre_repo,
                title_repo.clone(),
            )),
            review_service: Arc::new(ReviewService::new(review_repo.clone(), title_repo)),
            comment_service: Arc::new(CommentService::new(comment_repo, review_repo)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,yamdb_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting YaMDb API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let app = routes::build_router(AppState::new(db), &config)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
