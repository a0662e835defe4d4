//! User identity and request payload types
//!
//! The user directory is the system of record for identity and role; the
//! credential layer only reads these rows. Role is always resolved from the
//! directory at validation time, never trusted from a token claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// User role for access control
///
/// Serialized lowercase (`"user"`, `"admin"`) both in the API and in the
/// directory's role column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user with access to their own profile and session
    #[default]
    User,

    /// Administrator
    /// - All User permissions
    /// - Can change other users' roles
    Admin,
}

impl Role {
    /// Check if this role can manage other users
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user as stored in the directory
///
/// The password hash is never serialized to prevent accidental exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique username (lowercase, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2id password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Current role, mutated only through the directory
    pub role: Role,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of last profile update
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a directory row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Authentication token response returned after a successful login. Clients
/// present `access_token` as a bearer token until `expires_in` elapses or
/// the session is revoked server-side, whichever comes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// Signed access token for API authentication
    pub access_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: u64,
}

impl AuthToken {
    pub fn new(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username (case-insensitive)
    pub username: String,
    /// Plain text password (verified against the stored hash)
    pub password: String,
}

/// Registration request payload
///
/// Username must be unique and is normalized to lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Email address
    pub email: String,
    /// Plain text password
    pub password: String,
}

/// Request to change a user's role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// Validation errors for user input
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Invalid username: must be 3-30 characters, alphanumeric or underscore"
    )]
    InvalidUsername,

    #[error("Password too short: minimum 8 characters required")]
    PasswordTooShort,

    #[error("Invalid email address")]
    InvalidEmail,
}

impl RegisterRequest {
    /// Validate registration request
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Username: 3-30 chars, alphanumeric + underscore
        if self.username.len() < 3 || self.username.len() > 30 {
            return Err(ValidationError::InvalidUsername);
        }

        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(ValidationError::InvalidUsername);
        }

        if self.password.len() < 8 {
            return Err(ValidationError::PasswordTooShort);
        }

        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(ValidationError::InvalidEmail),
        }

        Ok(())
    }
}
