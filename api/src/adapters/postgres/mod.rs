//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod catalog_repo;
pub mod comment_repo;
pub mod review_repo;
pub mod title_repo;
pub mod user_repo;


pub use catalog_repo::{PostgresCategoryRepository, PostgresGenreRepository};
pub use comment_repo::PostgresCommentRepository;
pub use review_repo::PostgresReviewRepository;
pub use title_repo::PostgresTitleRepository;
pub use user_repo::PostgresUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

/// Map a write error, surfacing unique-constraint violations as `AlreadyExists`
pub(crate) fn write_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::AlreadyExists(msg),
        _ => DomainError::Database(e.to_string()),
    }
}

/// Map an `update` error, surfacing a missing row as `NotFound`
pub(crate) fn update_err(what: &str, id: impl std::fmt::Display, e: DbErr) -> DomainError {
    match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            DomainError::NotFound(format!("{} not found: {}", what, id))
        }
        e => write_err(e),
    }
}
