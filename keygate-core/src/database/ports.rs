use async_trait::async_trait;

use crate::error::Result;
use crate::user::{NewUser, Role, User};

// Identity lookup and role mutation; credentials live in the same row.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_role(&self, username: &str, role: Role) -> Result<()>;
}
