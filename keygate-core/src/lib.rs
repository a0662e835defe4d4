//! # Keygate Core
//!
//! Credential lifecycle for a user-management service: token issuance,
//! liveness-checked validation, and revocation.
//!
//! ## Overview
//!
//! Access tokens are signed JWTs, but validity is not purely stateless: at
//! issuance the token is also recorded as its subject's single live token in
//! a TTL-expiring session store. A presented token is authoritative only if
//! it decodes with a valid signature and unexpired claims *and* is byte-equal
//! to the liveness record for its subject. Deleting the record revokes a
//! token immediately, before its embedded expiry.
//!
//! ## Components
//!
//! - [`auth::TokenIssuer`] mints tokens and owns the write side of the
//!   liveness store (issue, revoke).
//! - [`auth::TokenValidator`] resolves a bearer token to the directory's
//!   current record for its subject.
//! - [`database::UserDirectory`] and [`session::SessionStore`] are the ports
//!   to the system of record and the liveness store; Postgres, Redis, and
//!   in-memory adapters live beside them.

pub mod api_types;
pub mod auth;
pub mod database;
pub mod error;
pub mod session;
pub mod user;

pub use auth::{AuthError, Claims, TokenCodec, TokenIssuer, TokenValidator};
pub use error::{CoreError, Result};
pub use user::{Role, User};
