//! User service
//!
//! Handles signup, API key authentication, and profile management.

use std::sync::{Arc, OnceLock};

use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::entities::{NewUser, User, UserId, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;

/// Reserved because `/users/me` addresses the caller
const RESERVED_USERNAME: &str = "me";

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Register a new user
    ///
    /// Returns (user, api_key). The key is only shown once; only its hash is stored.
    pub async fn signup(&self, username: &str, email: &str) -> Result<(User, String), AppError> {
        validate_username(username)?;
        validate_email(email)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with username '{}' already exists",
                username
            ))));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with email '{}' already exists",
                email
            ))));
        }

        let api_key = generate_api_key();
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            api_key_hash: hash_api_key(&api_key),
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

        Ok((user, api_key))
    }

    /// Find a user by their API key hash
    pub async fn find_by_api_key(&self, api_key_hash: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_api_key_hash(api_key_hash).await?)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<User, AppError> {
        self.users.find_by_id(id).await?.ok_or_else(|| {
            AppError::Domain(DomainError::NotFound(format!("User not found: {}", id)))
        })
    }

    /// List every user (admin)
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list().await?)
    }

    /// Update the caller's own profile. Role and staff flag are ignored.
    pub async fn update_me(&self, id: &UserId, update: UserUpdate) -> Result<User, AppError> {
        Ok(self.users.update(id, &update.self_service()).await?)
    }

    /// Update any user by username, including role and staff flag (admin)
    pub async fn update_user(&self, username: &str, update: UserUpdate) -> Result<User, AppError> {
        let user = self.users.find_by_username(username).await?.ok_or_else(|| {
            AppError::Domain(DomainError::NotFound(format!("User not found: {}", username)))
        })?;

        let updated = self.users.update(&user.id, &update).await?;
        if updated.role != user.role || updated.is_staff != user.is_staff {
            tracing::info!(
                user_id = %updated.id,
                role = %updated.role,
                is_staff = updated.is_staff,
                "User privileges changed"
            );
        }
        Ok(updated)
    }
}

fn username_pattern() -> &'static Regex {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    USERNAME.get_or_init(|| Regex::new(r"^[\w.@+-]+$").unwrap())
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.chars().count() > USERNAME_MAX {
        return Err(AppError::BadRequest(format!(
            "Username must be between 1 and {} characters",
            USERNAME_MAX
        )));
    }
    if !username_pattern().is_match(username) {
        return Err(AppError::BadRequest(
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ));
    }
    if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        return Err(AppError::BadRequest(format!(
            "Username '{}' is reserved",
            username
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email.len() <= EMAIL_MAX
        && matches!(email.split_once('@'), Some((local, domain)) if !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::BadRequest(format!("Invalid email: {}", email)));
    }
    Ok(())
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("sk-{}", hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}
