//! Application state shared across handlers.

use std::sync::Arc;

use emporium_core::api::{ApiClient, ApiError, media_url};
use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;

use crate::config::{ConfigError, StorefrontConfig};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build backend client: {0}")]
    Api(#[from] ApiError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds no per-visitor data; the logged-in
/// customer lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    session_key: Key,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session secret cannot be used as a signing key
    /// or the backend client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let session_key = Key::try_from(config.session_secret.expose_secret().as_bytes())
            .map_err(|e| {
                ConfigError::InsecureSecret("STOREFRONT_SESSION_SECRET".to_string(), e.to_string())
            })?;
        let api = ApiClient::new(config.api_url.clone(), config.api_timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session_key,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the REST backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Key used to sign the session cookie.
    #[must_use]
    pub fn session_key(&self) -> &Key {
        &self.inner.session_key
    }

    /// Absolute URL for a backend media path.
    #[must_use]
    pub fn media(&self, path: &str) -> String {
        media_url(&self.inner.config.upload_base, path)
    }
}
