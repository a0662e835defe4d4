use std::{fmt, sync::Arc};

use keygate_core::auth::{AuthError, TokenCodec, TokenIssuer, TokenValidator};
use keygate_core::database::UserDirectory;
use keygate_core::session::SessionStore;

use crate::infra::config::Config;

/// Shared application state.
///
/// The directory and session store are injected as trait objects so tests
/// and deployments can swap implementations without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionStore>,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, AuthError> {
        let codec = Arc::new(TokenCodec::new(
            &config.auth_secret_key,
            &config.auth_token_algorithm,
        )?);

        let issuer = Arc::new(TokenIssuer::new(
            codec.clone(),
            sessions.clone(),
            config.access_token_ttl(),
        ));
        let validator = Arc::new(TokenValidator::new(
            codec,
            sessions.clone(),
            directory.clone(),
        ));

        Ok(Self {
            config,
            directory,
            sessions,
            issuer,
            validator,
        })
    }
}
