//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::domain::entities::{
    Actor, Category, CategoryId, Genre, GenreId, Review, ReviewId, Role, Score, Title, TitleId,
    User, UserId,
};

/// Create a test user with the given role
pub fn test_user(role: Role) -> User {
    let id = UserId::new();
    User {
        id,
        username: format!("{}-{}", role, &id.0.to_string()[..8]),
        email: format!("{}@example.com", id),
        bio: String::new(),
        role,
        is_staff: false,
        api_key_hash: format!("hash-{}", id),
        created_at: Utc::now(),
    }
}

/// Create an authenticated actor for a fresh user with the given role
pub fn test_actor(role: Role) -> Actor {
    Actor::from(&test_user(role))
}

/// Create a test category with a specific slug
pub fn test_category(slug: &str) -> Category {
    Category {
        id: CategoryId::new(),
        name: slug.to_uppercase(),
        slug: slug.to_string(),
    }
}

/// Create a test genre with a specific slug
pub fn test_genre(slug: &str) -> Genre {
    Genre {
        id: GenreId::new(),
        name: slug.to_uppercase(),
        slug: slug.to_string(),
    }
}

/// Create an unrated test title in the "films" category
pub fn test_title() -> Title {
    Title {
        id: TitleId::new(),
        name: "Stalker".to_string(),
        year: Some(1979),
        description: Some("A guide leads two men through the Zone".to_string()),
        category: Some(test_category("films")),
        genres: vec![test_genre("drama")],
        rating: None,
    }
}

/// Create a test review
pub fn test_review(title_id: TitleId, author_id: UserId, score: i16) -> Review {
    Review {
        id: ReviewId::new(),
        title_id,
        author_id,
        text: format!("Worth a {}", score),
        score: Score::try_from(score).unwrap(),
        pub_date: Utc::now(),
    }
}
