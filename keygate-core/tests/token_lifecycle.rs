//! End-to-end lifecycle scenarios: issue, validate, supersede, revoke.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use keygate_core::auth::{AuthError, Claims, TokenCodec, TokenIssuer, TokenValidator, password};
use keygate_core::database::{MemoryDirectory, UserDirectory};
use keygate_core::session::{MemorySessionStore, SessionKeys, SessionStore};
use keygate_core::user::{NewUser, Role};

struct Harness {
    issuer: TokenIssuer,
    validator: TokenValidator,
    directory: Arc<MemoryDirectory>,
    sessions: Arc<MemorySessionStore>,
    codec: Arc<TokenCodec>,
}

fn harness() -> Harness {
    let codec = Arc::new(TokenCodec::new("test-secret-key", "HS256").unwrap());
    let sessions = Arc::new(MemorySessionStore::new());
    let directory = Arc::new(MemoryDirectory::new());

    let issuer = TokenIssuer::new(
        codec.clone(),
        sessions.clone(),
        Duration::from_secs(30 * 60),
    );
    let validator = TokenValidator::new(codec.clone(), sessions.clone(), directory.clone());

    Harness {
        issuer,
        validator,
        directory,
        sessions,
        codec,
    }
}

async fn seed_user(directory: &MemoryDirectory, username: &str, role: Role) {
    directory
        .create_user(&NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: password::hash("password123").unwrap(),
            role,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn issued_token_resolves_to_current_directory_record() {
    let h = harness();
    seed_user(&h.directory, "alice", Role::User).await;

    let token = h.issuer.issue("alice").await.unwrap();
    let user = h.validator.validate(&token.access_token).await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn second_login_supersedes_first_token() {
    let h = harness();
    seed_user(&h.directory, "alice", Role::User).await;

    let t1 = h.issuer.issue("alice").await.unwrap();
    let user = h.validator.validate(&t1.access_token).await.unwrap();
    assert_eq!(user.role, Role::User);

    let t2 = h.issuer.issue("alice").await.unwrap();

    let old = h.validator.validate(&t1.access_token).await;
    assert!(matches!(old, Err(AuthError::RevokedToken)));

    let current = h.validator.validate(&t2.access_token).await.unwrap();
    assert_eq!(current.username, "alice");
}

#[tokio::test]
async fn revoke_invalidates_outstanding_token() {
    let h = harness();
    seed_user(&h.directory, "bob", Role::User).await;

    let token = h.issuer.issue("bob").await.unwrap();
    h.validator.validate(&token.access_token).await.unwrap();

    h.issuer.revoke("bob").await.unwrap();

    let result = h.validator.validate(&token.access_token).await;
    assert!(matches!(result, Err(AuthError::RevokedToken)));
}

#[tokio::test]
async fn expired_token_is_invalid_regardless_of_liveness_record() {
    let h = harness();
    seed_user(&h.directory, "alice", Role::User).await;

    // Craft a token whose embedded expiry has passed, then plant it as the
    // live record: the signature/expiry check must reject before liveness
    // is even consulted.
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "alice".to_string(),
        exp: now - 120,
        iat: now - 1000,
    };
    let stale = h.codec.encode(&claims).unwrap();
    h.sessions
        .set(&SessionKeys::token("alice"), &stale, Duration::from_secs(300))
        .await
        .unwrap();

    let result = h.validator.validate(&stale).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn role_change_takes_effect_only_after_reissue() {
    let h = harness();
    seed_user(&h.directory, "bob", Role::User).await;

    let token = h.issuer.issue("bob").await.unwrap();
    assert_eq!(
        h.validator
            .validate(&token.access_token)
            .await
            .unwrap()
            .role,
        Role::User
    );

    // Admin promotes bob and revokes his session to force re-auth.
    h.directory.update_role("bob", Role::Admin).await.unwrap();
    h.issuer.revoke("bob").await.unwrap();

    let stale = h.validator.validate(&token.access_token).await;
    assert!(matches!(stale, Err(AuthError::RevokedToken)));

    let fresh = h.issuer.issue("bob").await.unwrap();
    let user = h.validator.validate(&fresh.access_token).await.unwrap();
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn token_signed_with_foreign_key_is_invalid() {
    let h = harness();
    seed_user(&h.directory, "alice", Role::User).await;
    h.issuer.issue("alice").await.unwrap();

    let foreign = TokenCodec::new("some-other-secret", "HS256").unwrap();
    let now = Utc::now().timestamp();
    let forged = foreign
        .encode(&Claims {
            sub: "alice".to_string(),
            exp: now + 900,
            iat: now,
        })
        .unwrap();

    let result = h.validator.validate(&forged).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn subject_missing_from_directory_is_an_integrity_anomaly() {
    let h = harness();

    // Token issued, then the user row disappears (never seeded here).
    let token = h.issuer.issue("ghost").await.unwrap();

    let result = h.validator.validate(&token.access_token).await;
    assert!(matches!(result, Err(AuthError::UnknownSubject)));
}

#[tokio::test]
async fn revocation_is_scoped_to_one_subject() {
    let h = harness();
    seed_user(&h.directory, "alice", Role::User).await;
    seed_user(&h.directory, "bob", Role::User).await;

    let alice = h.issuer.issue("alice").await.unwrap();
    let bob = h.issuer.issue("bob").await.unwrap();

    h.issuer.revoke("alice").await.unwrap();

    assert!(matches!(
        h.validator.validate(&alice.access_token).await,
        Err(AuthError::RevokedToken)
    ));
    assert!(h.validator.validate(&bob.access_token).await.is_ok());
}
