//! User domain entity
//!
//! Users write reviews and comments. Their role (and the staff flag)
//! decide what else they may change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_id!(
    /// Unique identifier for a user
    UserId
);

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Fold the staff flag into the role. Staff accounts are admins.
    pub fn effective(role: Role, is_staff: bool) -> Role {
        if is_staff {
            Role::Admin
        } else {
            role
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Moderator => write!(f, "moderator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub role: Role,
    pub is_staff: bool,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn effective_role(&self) -> Role {
        Role::effective(self.role, self.is_staff)
    }
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub api_key_hash: String,
}

/// Changes applied to an existing user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub bio: Option<String>,
    pub role: Option<Role>,
    pub is_staff: Option<bool>,
}

impl UserUpdate {
    /// Strip the privileged fields, leaving what a user may change on their own profile
    pub fn self_service(self) -> Self {
        Self {
            bio: self.bio,
            role: None,
            is_staff: None,
        }
    }
}

/// The principal issuing a request.
///
/// The effective role is computed once, when the actor is resolved, so
/// every policy check downstream sees the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated { user_id: UserId, role: Role },
}

impl Actor {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    /// Effective role, `None` for anonymous actors
    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { role, .. } => Some(*role),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::Authenticated {
            user_id: user.id,
            role: user.effective_role(),
        }
    }
}
