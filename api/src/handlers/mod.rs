//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod catalog;
pub mod comments;
pub mod reviews;
pub mod titles;
pub mod users;

pub use catalog::{
    create_category, create_genre, delete_category, delete_genre, list_categories, list_genres,
};
pub use comments::{create_comment, delete_comment, get_comment, list_comments, update_comment};
pub use reviews::{create_review, delete_review, get_review, list_reviews, update_review};
pub use titles::{create_title, delete_title, get_title, list_titles, update_title};
pub use users::{get_me, list_users, signup, update_me, update_user};
