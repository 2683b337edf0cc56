//! User registration and lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use cloudstore_core::error::AppError;
use cloudstore_core::types::UserId;
use cloudstore_database::store::UserStore;
use cloudstore_entity::user::{CreateUser, User, is_valid_email, normalize_email};

use crate::context::RequestContext;

/// Public projection of a user shown next to shared items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID.
    pub id: UserId,
    /// Email.
    pub email: String,
    /// Display name.
    pub full_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Handles the user directory.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Registers a user under a normalized email.
    pub async fn register(&self, email: &str, full_name: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::invalid_email(&email));
        }
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name must not be empty"));
        }

        let user = self
            .users
            .create(&CreateUser {
                email,
                full_name: full_name.to_string(),
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Gets the current user's profile.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.get(ctx.user_id).await
    }

    /// Finds a user by email, normalizing it first.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(&normalize_email(email)).await
    }

    /// Summary of a user, if they still exist.
    pub async fn summary(&self, id: UserId) -> Result<Option<UserSummary>, AppError> {
        Ok(self.users.find_by_id(id).await?.map(UserSummary::from))
    }
}
