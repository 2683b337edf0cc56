use async_trait::async_trait;
use chrono::Utc;

use cloudstore_core::error::AppError;
use cloudstore_core::result::AppResult;
use cloudstore_core::types::UserId;
use cloudstore_entity::user::{CreateUser, User};

use super::MemoryStore;
use crate::store::UserStore;

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "User with email '{}' already exists",
                data.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}
