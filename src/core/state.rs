use std::sync::Arc;

use crate::controllers::auth::AuthController;
use crate::core::config::{Args, ClientSettings};
use crate::core::error::ConfigError;
use crate::identity::IdentityStore;
use crate::token::TokenCodec;
use crate::utils::path::PathNormalizer;

/// Everything a handler can reach. Built once at startup and never mutated,
/// so clones are shared freely across requests.
#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) auth_controller: AuthController,
    pub(crate) client_settings: Arc<ClientSettings>,
    pub(crate) normalizer: PathNormalizer,
}

impl AppState {
    pub(crate) fn new(config: &Args, identities: IdentityStore) -> Result<Self, ConfigError> {
        let codec = TokenCodec::new(
            &config.secret,
            config.access_lifetime(),
            config.refresh_lifetime(),
        );

        Ok(AppState {
            auth_controller: AuthController::new(Arc::new(identities), codec),
            client_settings: Arc::new(config.client_settings()?),
            normalizer: PathNormalizer::new()?,
        })
    }
}
