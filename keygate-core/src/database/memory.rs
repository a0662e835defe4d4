use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ports::UserDirectory;
use crate::error::{CoreError, Result};
use crate::user::{NewUser, Role, User};

/// In-memory user directory for tests and single-node development.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().await;

        let taken = users.contains_key(&user.username)
            || users.values().any(|u| u.email == user.email);
        if taken {
            return Err(CoreError::Conflict(
                "username or email already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.username.clone(), created.clone());

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_role(&self, username: &str, role: Role) -> Result<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(username)
            .ok_or_else(|| CoreError::NotFound(format!("user: {username}")))?;

        user.role = role;
        user.updated_at = Utc::now();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let directory = MemoryDirectory::new();
        directory
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_name = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.email, "alice@example.com");

        let by_email = directory
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let directory = MemoryDirectory::new();
        directory
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let same_name = directory
            .create_user(&new_user("alice", "other@example.com"))
            .await;
        assert!(matches!(same_name, Err(CoreError::Conflict(_))));

        let same_email = directory
            .create_user(&new_user("bob", "alice@example.com"))
            .await;
        assert!(matches!(same_email, Err(CoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_role_mutates_existing_row_only() {
        let directory = MemoryDirectory::new();
        directory
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        directory.update_role("alice", Role::Admin).await.unwrap();
        let alice = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.role, Role::Admin);

        let missing = directory.update_role("ghost", Role::Admin).await;
        assert!(matches!(missing, Err(CoreError::NotFound(_))));
    }
}
