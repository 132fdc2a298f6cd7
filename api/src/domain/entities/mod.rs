//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

/// Declares a UUID-backed identifier newtype
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(id: uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod catalog;
pub mod comment;
pub mod review;
pub mod title;
pub mod user;

pub use catalog::{Category, CategoryId, Genre, GenreId, NewCategory, NewGenre};
pub use comment::{Comment, CommentId, NewComment};
pub use review::{mean_score, NewReview, Review, ReviewId, ReviewUpdate, Score};
pub use title::{NewTitle, Title, TitleFilter, TitleId, TitleUpdate};
pub use user::{Actor, NewUser, Role, User, UserId, UserUpdate};
