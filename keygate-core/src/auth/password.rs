//! One-way password function.
//!
//! Deployed as Argon2id; callers treat it as an opaque hash/verify pair.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{CoreError, Result};

/// Hash a plaintext password for storage in the directory.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CoreError::Internal("Failed to hash password".to_string()))
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as false; login failures stay uniform
/// either way.
pub fn verify(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
