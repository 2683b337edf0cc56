//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cloudstore_core::types::UserId;

/// A registered user. Identity is owned by the external auth service;
/// this row is what grants resolve emails against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Normalized (trimmed, lower-cased) email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (normalized before persisting).
    pub email: String,
    /// Display name.
    pub full_name: String,
}
