//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    Category, Comment, CommentId, Genre, NewCategory, NewComment, NewGenre, NewReview, NewTitle,
    NewUser, Review, ReviewId, ReviewUpdate, Title, TitleFilter, TitleId, TitleUpdate, User,
    UserId, UserUpdate,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List all users ordered by username
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Create a new user with role `user`
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Apply a partial update
    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, DomainError>;
}

/// Repository for Category entities
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;

    /// Create a category. Fails with `AlreadyExists` on a duplicate slug.
    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError>;

    /// Delete by slug. Titles in the category keep existing without one.
    async fn delete(&self, slug: &str) -> Result<(), DomainError>;
}

/// Repository for Genre entities
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError>;

    /// Create a genre. Fails with `AlreadyExists` on a duplicate slug.
    async fn create(&self, genre: &NewGenre) -> Result<Genre, DomainError>;

    /// Delete by slug, detaching it from every title
    async fn delete(&self, slug: &str) -> Result<(), DomainError>;
}

/// Repository for Title entities
#[async_trait]
pub trait TitleRepository: Send + Sync {
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError>;

    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, DomainError>;

    /// Create a title with no rating
    async fn create(&self, title: &NewTitle) -> Result<Title, DomainError>;

    async fn update(&self, id: &TitleId, update: &TitleUpdate) -> Result<Title, DomainError>;

    /// Delete a title together with its reviews and their comments
    async fn delete(&self, id: &TitleId) -> Result<(), DomainError>;

    /// Overwrite the stored rating. Only the rating service calls this.
    async fn update_rating(&self, id: &TitleId, rating: Option<f64>) -> Result<(), DomainError>;
}

/// Repository for Review entities
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError>;

    /// Reviews of a title, newest first
    async fn find_by_title(&self, title_id: &TitleId) -> Result<Vec<Review>, DomainError>;

    async fn create(&self, review: &NewReview) -> Result<Review, DomainError>;

    async fn update(&self, id: &ReviewId, update: &ReviewUpdate) -> Result<Review, DomainError>;

    /// Delete a review together with its comments
    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError>;

    /// Mean score of all reviews of a title, `None` when it has none
    async fn average_score(&self, title_id: &TitleId) -> Result<Option<f64>, DomainError>;
}

/// Repository for Comment entities
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError>;

    /// Comments on a review, oldest first
    async fn find_by_review(&self, review_id: &ReviewId) -> Result<Vec<Comment>, DomainError>;

    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError>;

    async fn update_text(&self, id: &CommentId, text: &str) -> Result<Comment, DomainError>;

    async fn delete(&self, id: &CommentId) -> Result<(), DomainError>;
}
