use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{AuthError, Claims, TokenCodec};
use crate::session::{SessionKeys, SessionStore};
use crate::user::AuthToken;

/// Mints signed access tokens and records each one as its subject's single
/// live token.
///
/// The issuer performs no credential check itself; callers pass a subject
/// they have already authenticated.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            sessions,
            default_ttl,
        }
    }

    /// Issue a token with the configured default validity window.
    pub async fn issue(&self, subject: &str) -> Result<AuthToken, AuthError> {
        self.issue_with_ttl(subject, self.default_ttl).await
    }

    /// Issue a token valid for `ttl`.
    ///
    /// Unconditionally overwrites the subject's liveness record, so any
    /// previously issued token stops validating immediately. The embedded
    /// expiry and the record TTL both derive from the same `ttl` value.
    ///
    /// Concurrent issuance for one subject is last-writer-wins: every caller
    /// gets a token back, but only the one whose store write landed last
    /// keeps validating. Sessions are advisory, not exclusive locks.
    pub async fn issue_with_ttl(
        &self,
        subject: &str,
        ttl: Duration,
    ) -> Result<AuthToken, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + chrono::Duration::seconds(ttl.as_secs() as i64)).timestamp(),
            iat: now.timestamp(),
        };

        let token = self
            .codec
            .encode(&claims)
            .map_err(|e| AuthError::Configuration(format!("failed to sign token: {e}")))?;

        self.sessions
            .set(&SessionKeys::token(subject), &token, ttl)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        debug!(subject, ttl_secs = ttl.as_secs(), "issued access token");

        Ok(AuthToken::new(token, ttl.as_secs()))
    }

    /// The subject's currently live token, if any, with its remaining
    /// validity.
    ///
    /// Lets the login layer decide to reuse a live session instead of
    /// minting a new one; that policy belongs to the caller, not the issuer.
    pub async fn live(&self, subject: &str) -> Result<Option<AuthToken>, AuthError> {
        let token = self
            .sessions
            .get(&SessionKeys::token(subject))
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        let Some(token) = token else {
            return Ok(None);
        };

        // A lingering record that no longer decodes is not reusable.
        let Ok(claims) = self.codec.decode(&token) else {
            return Ok(None);
        };

        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(None);
        }

        Ok(Some(AuthToken::new(token, remaining as u64)))
    }

    /// Delete the subject's liveness record.
    ///
    /// Outstanding tokens for the subject stop validating immediately, even
    /// while still cryptographically valid.
    pub async fn revoke(&self, subject: &str) -> Result<(), AuthError> {
        self.sessions
            .delete(&SessionKeys::token(subject))
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        debug!(subject, "revoked live token");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn issuer_with_store() -> (TokenIssuer, Arc<MemorySessionStore>) {
        let codec = Arc::new(TokenCodec::new("test-secret-key", "HS256").unwrap());
        let sessions = Arc::new(MemorySessionStore::new());
        let issuer = TokenIssuer::new(codec, sessions.clone(), Duration::from_secs(1800));
        (issuer, sessions)
    }

    #[tokio::test]
    async fn issue_records_token_as_live() {
        let (issuer, sessions) = issuer_with_store();

        let token = issuer.issue("alice").await.unwrap();

        let stored = sessions.get("token:alice").await.unwrap();
        assert_eq!(stored.as_deref(), Some(token.access_token.as_str()));
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 1800);
    }

    #[tokio::test]
    async fn second_issue_overwrites_liveness_record() {
        let (issuer, sessions) = issuer_with_store();

        let first = issuer.issue("alice").await.unwrap();
        let second = issuer
            .issue_with_ttl("alice", Duration::from_secs(60))
            .await
            .unwrap();

        let stored = sessions.get("token:alice").await.unwrap().unwrap();
        assert_eq!(stored, second.access_token);
        assert_ne!(stored, first.access_token);
    }

    #[tokio::test]
    async fn live_returns_current_token_until_revoked() {
        let (issuer, _sessions) = issuer_with_store();

        assert!(issuer.live("alice").await.unwrap().is_none());

        let issued = issuer.issue("alice").await.unwrap();
        let live = issuer.live("alice").await.unwrap().unwrap();
        assert_eq!(live.access_token, issued.access_token);
        assert!(live.expires_in <= 1800);

        issuer.revoke("alice").await.unwrap();
        assert!(issuer.live("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn issuance_is_scoped_per_subject() {
        let (issuer, sessions) = issuer_with_store();

        issuer.issue("alice").await.unwrap();
        issuer.issue("bob").await.unwrap();
        issuer.revoke("alice").await.unwrap();

        assert!(sessions.get("token:alice").await.unwrap().is_none());
        assert!(sessions.get("token:bob").await.unwrap().is_some());
    }
}
