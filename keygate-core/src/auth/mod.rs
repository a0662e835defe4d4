//! Credential issuance and validation
//!
//! Tokens are signed JWTs checked against a server-side liveness record, so
//! a cryptographically valid token can still be revoked before its embedded
//! expiry. [`TokenIssuer`] owns the write side (issue, revoke) and
//! [`TokenValidator`] the read side of that record.

mod issuer;
pub mod password;
mod token;
mod validator;

pub use issuer::TokenIssuer;
pub use token::{Claims, TokenCodec};
pub use validator::TokenValidator;

use thiserror::Error;

/// Authentication errors
///
/// The first three variants are authentication outcomes; the outer layer
/// must collapse them into one uniform rejection. The remaining variants are
/// infrastructure failures and must surface as retriable errors, never as
/// "not authenticated".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("unknown subject")]
    UnknownSubject,

    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("user directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// True for authentication outcomes, false for infrastructure failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::RevokedToken | AuthError::UnknownSubject
        )
    }
}
