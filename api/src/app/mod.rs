//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, policy and ports.

pub mod access;
pub mod catalog_service;
pub mod comment_service;
pub mod rating_service;
pub mod review_service;
pub mod user_service;

pub use catalog_service::{CatalogService, TitleInput};
pub use comment_service::CommentService;
pub use review_service::ReviewService;
pub use user_service::{hash_api_key, UserService};
