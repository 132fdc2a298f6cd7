//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{update_err, write_err};
use crate::domain::entities::{NewUser, Role, User, UserId, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: users::Column, value: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        self.find_one(users::Column::ApiKeyHash, hash).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one(users::Column::Username, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one(users::Column::Email, email).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let results = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            bio: Set(String::new()),
            role: Set(Role::User.to_string()),
            is_staff: Set(false),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(write_err)?;

        Ok(result.into())
    }

    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, DomainError> {
        if update.bio.is_none() && update.role.is_none() && update.is_staff.is_none() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", id)));
        }

        let mut model = users::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        if let Some(bio) = &update.bio {
            model.bio = Set(bio.clone());
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(is_staff) = update.is_staff {
            model.is_staff = Set(is_staff);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_err("User", id, e))?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            email: model.email,
            bio: model.bio,
            role: model.role.parse().unwrap_or_default(),
            is_staff: model.is_staff,
            api_key_hash: model.api_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
