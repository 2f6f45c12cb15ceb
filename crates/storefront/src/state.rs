//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::ecwid::EcwidClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the Ecwid client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    ecwid: EcwidClient,
}

impl AppState {
    /// Create a new application state with a client built from `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let ecwid = EcwidClient::new(&config.ecwid);
        Self::with_client(config, ecwid)
    }

    /// Create application state around an existing client.
    #[must_use]
    pub fn with_client(config: StorefrontConfig, ecwid: EcwidClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, ecwid }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Ecwid API client.
    #[must_use]
    pub fn ecwid(&self) -> &EcwidClient {
        &self.inner.ecwid
    }
}
