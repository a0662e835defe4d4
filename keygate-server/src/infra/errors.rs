use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use keygate_core::auth::AuthError;
use keygate_core::error::CoreError;
use keygate_core::user::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

// Convert from various error types
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => Self::not_found(msg),
            CoreError::Conflict(msg) => Self::conflict(msg),
            CoreError::Database(e) => {
                tracing::error!(error = ?e, "directory operation failed");
                Self::unavailable("Service temporarily unavailable")
            }
            CoreError::Store(e) => {
                tracing::error!(error = %e, "session store operation failed");
                Self::unavailable("Service temporarily unavailable")
            }
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // The three rejection kinds collapse into one body so callers
            // cannot probe which check failed or whether a username exists.
            AuthError::InvalidToken | AuthError::RevokedToken | AuthError::UnknownSubject => {
                Self::unauthorized("Invalid authentication credentials")
            }
            AuthError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "session store unavailable");
                Self::unavailable("Service temporarily unavailable")
            }
            AuthError::DirectoryUnavailable(e) => {
                tracing::error!(error = %e, "user directory unavailable");
                Self::unavailable("Service temporarily unavailable")
            }
            AuthError::Configuration(e) => {
                tracing::error!(error = %e, "auth configuration error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_kinds_collapse_to_uniform_unauthorized() {
        let bodies: Vec<AppError> = vec![
            AuthError::InvalidToken.into(),
            AuthError::RevokedToken.into(),
            AuthError::UnknownSubject.into(),
        ];

        for err in &bodies {
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        }

        // Identical message regardless of which check failed.
        assert!(
            bodies
                .windows(2)
                .all(|pair| pair[0].message == pair[1].message)
        );
    }

    #[test]
    fn infrastructure_failures_are_retriable_not_unauthorized() {
        let store: AppError = AuthError::StoreUnavailable("connection refused".into()).into();
        assert_eq!(store.status, StatusCode::SERVICE_UNAVAILABLE);

        let directory: AppError = AuthError::DirectoryUnavailable("timeout".into()).into();
        assert_eq!(directory.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn core_conflict_and_not_found_map_to_client_errors() {
        let conflict: AppError = CoreError::Conflict("taken".into()).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let missing: AppError = CoreError::NotFound("user: x".into()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
