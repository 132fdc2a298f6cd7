//! In-memory implementations of repository ports
//!
//! All repositories read and write one shared `InMemoryDb`, so the
//! relational side effects of the Postgres schema (cascading deletes,
//! category set-null, genre detachment) are visible across them.
//! Repositories created with `new()` get a private database; use
//! `with_db` to make several repositories share one.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    mean_score, Category, CategoryId, Comment, CommentId, Genre, GenreId, NewCategory, NewComment,
    NewGenre, NewReview, NewTitle, NewUser, Review, ReviewId, ReviewUpdate, Role, Title,
    TitleFilter, TitleId, TitleUpdate, User, UserId, UserUpdate,
};
use crate::domain::ports::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};
use crate::error::DomainError;

// ============================================================================
// Shared tables
// ============================================================================

/// Stored form of a title: relations by id, like the `titles` table
#[derive(Debug, Clone)]
struct TitleRow {
    id: TitleId,
    name: String,
    year: Option<i16>,
    description: Option<String>,
    category_id: Option<CategoryId>,
    genre_ids: Vec<GenreId>,
    rating: Option<f64>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    genres: Vec<Genre>,
    titles: Vec<TitleRow>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
}

impl Tables {
    fn materialize(&self, row: &TitleRow) -> Title {
        Title {
            id: row.id,
            name: row.name.clone(),
            year: row.year,
            description: row.description.clone(),
            category: row
                .category_id
                .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned()),
            genres: row
                .genre_ids
                .iter()
                .filter_map(|id| self.genres.iter().find(|g| g.id == *id).cloned())
                .collect(),
            rating: row.rating,
        }
    }

    fn delete_review_cascade(&mut self, id: &ReviewId) {
        self.reviews.retain(|r| r.id != *id);
        self.comments.retain(|c| c.review_id != *id);
    }
}

/// Shared in-memory database backing the repositories below
#[derive(Default)]
pub struct InMemoryDb {
    tables: RwLock<Tables>,
}

impl InMemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn failure() -> DomainError {
    DomainError::Database("store unavailable".to_string())
}

fn not_found(what: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::NotFound(format!("{} not found: {}", what, id))
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.db.tables.write().unwrap().users.push(user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.users.iter().find(|u| u.api_key_hash == hash).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        let mut users = tables.users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(DomainError::AlreadyExists(new_user.username.clone()));
        }

        let user = User {
            id: UserId::new(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            bio: String::new(),
            role: Role::User,
            is_staff: false,
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| not_found("User", id))?;

        if let Some(bio) = &update.bio {
            user.bio = bio.clone();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_staff) = update.is_staff {
            user.is_staff = is_staff;
        }
        Ok(user.clone())
    }
}

// ============================================================================
// In-Memory Category / Genre Repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        if tables.categories.iter().any(|c| c.slug == category.slug) {
            return Err(DomainError::AlreadyExists(format!(
                "Category with slug '{}'",
                category.slug
            )));
        }
        let created = Category {
            id: CategoryId::new(),
            name: category.name.clone(),
            slug: category.slug.clone(),
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        let id = tables
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
            .ok_or_else(|| not_found("Category", slug))?;

        tables.categories.retain(|c| c.id != id);
        for title in tables.titles.iter_mut() {
            if title.category_id == Some(id) {
                title.category_id = None;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGenreRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryGenreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for InMemoryGenreRepository {
    async fn list(&self) -> Result<Vec<Genre>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        let mut genres = tables.genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.genres.iter().find(|g| g.slug == slug).cloned())
    }

    async fn create(&self, genre: &NewGenre) -> Result<Genre, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        if tables.genres.iter().any(|g| g.slug == genre.slug) {
            return Err(DomainError::AlreadyExists(format!(
                "Genre with slug '{}'",
                genre.slug
            )));
        }
        let created = Genre {
            id: GenreId::new(),
            name: genre.name.clone(),
            slug: genre.slug.clone(),
        };
        tables.genres.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        let id = tables
            .genres
            .iter()
            .find(|g| g.slug == slug)
            .map(|g| g.id)
            .ok_or_else(|| not_found("Genre", slug))?;

        tables.genres.retain(|g| g.id != id);
        for title in tables.titles.iter_mut() {
            title.genre_ids.retain(|g| *g != id);
        }
        Ok(())
    }
}

// ============================================================================
// In-Memory Title Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTitleRepository {
    db: Arc<InMemoryDb>,
    /// When set, every write fails with a database error
    fail_writes: bool,
}

impl InMemoryTitleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self {
            db,
            fail_writes: false,
        }
    }

    /// Pre-populate with a title (and its category and genres)
    pub fn with_title(self, title: Title) -> Self {
        self.insert(title);
        self
    }

    /// Make every write fail, as if the store went away
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn insert(&self, title: Title) {
        let mut tables = self.db.tables.write().unwrap();
        if let Some(category) = &title.category {
            if !tables.categories.iter().any(|c| c.id == category.id) {
                tables.categories.push(category.clone());
            }
        }
        for genre in &title.genres {
            if !tables.genres.iter().any(|g| g.id == genre.id) {
                tables.genres.push(genre.clone());
            }
        }
        tables.titles.push(TitleRow {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            category_id: title.category.map(|c| c.id),
            genre_ids: title.genres.iter().map(|g| g.id).collect(),
            rating: title.rating,
        });
    }
}

#[async_trait]
impl TitleRepository for InMemoryTitleRepository {
    async fn find_by_id(&self, id: &TitleId) -> Result<Option<Title>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables
            .titles
            .iter()
            .find(|t| t.id == *id)
            .map(|row| tables.materialize(row)))
    }

    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        let mut titles: Vec<Title> = tables
            .titles
            .iter()
            .map(|row| tables.materialize(row))
            .filter(|t| filter.matches(t))
            .collect();
        titles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(titles)
    }

    async fn create(&self, title: &NewTitle) -> Result<Title, DomainError> {
        if self.fail_writes {
            return Err(failure());
        }
        let row = TitleRow {
            id: TitleId::new(),
            name: title.name.clone(),
            year: title.year,
            description: title.description.clone(),
            category_id: title.category_id,
            genre_ids: title.genre_ids.clone(),
            rating: None,
        };
        let mut tables = self.db.tables.write().unwrap();
        tables.titles.push(row.clone());
        Ok(tables.materialize(&row))
    }

    async fn update(&self, id: &TitleId, update: &TitleUpdate) -> Result<Title, DomainError> {
        if self.fail_writes {
            return Err(failure());
        }
        let mut tables = self.db.tables.write().unwrap();
        let row = tables
            .titles
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| not_found("Title", id))?;

        if let Some(name) = &update.name {
            row.name = name.clone();
        }
        if let Some(year) = update.year {
            row.year = year;
        }
        if let Some(description) = &update.description {
            row.description = description.clone();
        }
        if let Some(category_id) = update.category_id {
            row.category_id = category_id;
        }
        if let Some(genre_ids) = &update.genre_ids {
            row.genre_ids = genre_ids.clone();
        }
        let row = row.clone();
        Ok(tables.materialize(&row))
    }

    async fn delete(&self, id: &TitleId) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(failure());
        }
        let mut tables = self.db.tables.write().unwrap();
        tables.titles.retain(|t| t.id != *id);
        let review_ids: Vec<ReviewId> = tables
            .reviews
            .iter()
            .filter(|r| r.title_id == *id)
            .map(|r| r.id)
            .collect();
        for review_id in &review_ids {
            tables.delete_review_cascade(review_id);
        }
        Ok(())
    }

    async fn update_rating(&self, id: &TitleId, rating: Option<f64>) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(failure());
        }
        let mut tables = self.db.tables.write().unwrap();
        let row = tables
            .titles
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| not_found("Title", id))?;
        row.rating = rating;
        Ok(())
    }
}

// ============================================================================
// In-Memory Review Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryReviewRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }

    /// Pre-populate with a review for testing
    pub fn with_review(self, review: Review) -> Self {
        self.db.tables.write().unwrap().reviews.push(review);
        self
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.reviews.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_by_title(&self, title_id: &TitleId) -> Result<Vec<Review>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        let mut reviews: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.title_id == *title_id)
            .cloned()
            .collect();
        reviews.reverse();
        reviews.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(reviews)
    }

    async fn create(&self, review: &NewReview) -> Result<Review, DomainError> {
        let created = Review {
            id: ReviewId::new(),
            title_id: review.title_id,
            author_id: review.author_id,
            text: review.text.clone(),
            score: review.score,
            pub_date: Utc::now(),
        };
        self.db.tables.write().unwrap().reviews.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &ReviewId, update: &ReviewUpdate) -> Result<Review, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        let review = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| not_found("Review", id))?;

        if let Some(text) = &update.text {
            review.text = text.clone();
        }
        if let Some(score) = update.score {
            review.score = score;
        }
        Ok(review.clone())
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError> {
        self.db.tables.write().unwrap().delete_review_cascade(id);
        Ok(())
    }

    async fn average_score(&self, title_id: &TitleId) -> Result<Option<f64>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(mean_score(
            tables
                .reviews
                .iter()
                .filter(|r| r.title_id == *title_id)
                .map(|r| r.score),
        ))
    }
}

// ============================================================================
// In-Memory Comment Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCommentRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables.comments.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_review(&self, review_id: &ReviewId) -> Result<Vec<Comment>, DomainError> {
        let tables = self.db.tables.read().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.review_id == *review_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let created = Comment {
            id: CommentId::new(),
            review_id: comment.review_id,
            author_id: comment.author_id,
            text: comment.text.clone(),
            pub_date: Utc::now(),
        };
        self.db
            .tables
            .write()
            .unwrap()
            .comments
            .push(created.clone());
        Ok(created)
    }

    async fn update_text(&self, id: &CommentId, text: &str) -> Result<Comment, DomainError> {
        let mut tables = self.db.tables.write().unwrap();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| not_found("Comment", id))?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), DomainError> {
        self.db.tables.write().unwrap().comments.retain(|c| c.id != *id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Score;
    use crate::test_utils::test_title;

    #[tokio::test]
    async fn deleting_title_cascades_to_reviews_and_comments() {
        let db = InMemoryDb::new();
        let titles = InMemoryTitleRepository::with_db(db.clone()).with_title(test_title());
        let reviews = InMemoryReviewRepository::with_db(db.clone());
        let comments = InMemoryCommentRepository::with_db(db.clone());

        let title_id = titles.list(&TitleFilter::default()).await.unwrap()[0].id;
        let review = reviews
            .create(&NewReview {
                title_id,
                author_id: UserId::new(),
                text: "Text".to_string(),
                score: Score::try_from(5).unwrap(),
            })
            .await
            .unwrap();
        let comment = comments
            .create(&NewComment {
                review_id: review.id,
                author_id: UserId::new(),
                text: "Reply".to_string(),
            })
            .await
            .unwrap();

        titles.delete(&title_id).await.unwrap();

        assert!(reviews.find_by_id(&review.id).await.unwrap().is_none());
        assert!(comments.find_by_id(&comment.id).await.unwrap().is_none());
    }
}
