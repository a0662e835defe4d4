use std::sync::Arc;
use tracing::debug;

use super::{AuthError, TokenCodec};
use crate::database::UserDirectory;
use crate::session::{SessionKeys, SessionStore};
use crate::user::User;

/// Resolves presented bearer tokens to identities.
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator").finish_non_exhaustive()
    }
}

impl TokenValidator {
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            codec,
            sessions,
            directory,
        }
    }

    /// Validate a presented token and resolve its subject.
    ///
    /// A token is authoritative only if it decodes with a valid signature
    /// and unexpired claims AND is byte-equal to the liveness record for its
    /// subject. A missing record counts as revoked, which also covers the
    /// case of a store entry outliving a skewed embedded expiry. The
    /// returned identity carries the directory's current role, never a role
    /// claim from issuance time.
    pub async fn validate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let live = self
            .sessions
            .get(&SessionKeys::token(&claims.sub))
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        if live.as_deref() != Some(token) {
            debug!(subject = %claims.sub, "presented token is not the live token");
            return Err(AuthError::RevokedToken);
        }

        let user = self
            .directory
            .find_by_username(&claims.sub)
            .await
            .map_err(|e| AuthError::DirectoryUnavailable(e.to_string()))?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(user)
    }
}
