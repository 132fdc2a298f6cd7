//! SeaORM entities
//!
//! Table-level models used by the Postgres adapters. Domain code never
//! sees these; adapters convert them into `domain::entities` types.

pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod title_genres;
pub mod titles;
pub mod users;
