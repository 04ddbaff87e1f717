//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::mirror::MirrorStore;
use crate::resource::ResourceClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the resource store client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: ResourceClient,
    mirror: MirrorStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The resource client is built from the configured store URL and
    /// the mirror is opened at the configured path (in-memory when no
    /// path is set).
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let client = ResourceClient::new(&config.resource_api_url);
        let mirror = MirrorStore::open(config.mirror_path.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                mirror,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the resource store client.
    #[must_use]
    pub fn client(&self) -> &ResourceClient {
        &self.inner.client
    }

    /// Get a reference to the local mirror store.
    #[must_use]
    pub fn mirror(&self) -> &MirrorStore {
        &self.inner.mirror
    }
}
