//! User directory store.

use async_trait::async_trait;

use cloudstore_core::result::AppResult;
use cloudstore_core::types::UserId;
use cloudstore_entity::user::{CreateUser, User};

/// Lookup and registration of users.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Register a user. Fails with a conflict if the email is taken.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}
