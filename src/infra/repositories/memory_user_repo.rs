use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local user store keyed by username.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.username.clone(), u)).collect();
        Self { users: RwLock::new(users) }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
