//! HTTP route table
//!
//! Route groups carry their access gate as a route layer; the actor
//! middleware wraps everything so every handler sees an `Actor`.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::PostgresUserRepository;
use crate::auth;
use crate::config::Config;
use crate::domain::policy::Gate;
use crate::handlers;
use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Assemble the full application router over `state`
pub fn build_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    // Rate limiting for signup, keyed on the peer address
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.signup_per_second)
            .burst_size(config.signup_burst)
            .finish()
            .context("Invalid signup rate limit")?,
    );

    let signup_routes = Router::new()
        .route("/auth/signup", post(handlers::signup))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Any authenticated user; handlers reject anonymous callers
    let profile_routes = Router::new().route(
        "/users/me",
        get(handlers::get_me).patch(handlers::update_me),
    );

    let admin_routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/:username", patch(handlers::update_user))
        .route_layer(middleware::from_fn_with_state(
            Gate::AdminOnly,
            auth::enforce_gate,
        ));

    // Anyone reads, admins write
    let catalog_routes = Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/categories/:slug", delete(handlers::delete_category))
        .route(
            "/genres",
            get(handlers::list_genres).post(handlers::create_genre),
        )
        .route("/genres/:slug", delete(handlers::delete_genre))
        .route(
            "/titles",
            get(handlers::list_titles).post(handlers::create_title),
        )
        .route(
            "/titles/:id",
            get(handlers::get_title)
                .patch(handlers::update_title)
                .delete(handlers::delete_title),
        )
        .route_layer(middleware::from_fn_with_state(
            Gate::AdminOrReadOnly,
            auth::enforce_gate,
        ));

    // Ownership is checked per object inside the services
    let review_routes = Router::new()
        .route(
            "/titles/:id/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route(
            "/titles/:id/reviews/:review_id",
            get(handlers::get_review)
                .patch(handlers::update_review)
                .delete(handlers::delete_review),
        )
        .route(
            "/titles/:id/reviews/:review_id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/titles/:id/reviews/:review_id/comments/:comment_id",
            get(handlers::get_comment)
                .patch(handlers::update_comment)
                .delete(handlers::delete_comment),
        );

    Ok(Router::new()
        .route("/health", get(health))
        .merge(signup_routes)
        .merge(profile_routes)
        .merge(admin_routes)
        .merge(catalog_routes)
        .merge(review_routes)
        .layer(middleware::from_fn_with_state(
            state.user_service.clone(),
            auth::actor_middleware::<PostgresUserRepository>,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
