//! Application state shared across handlers.

use std::sync::Arc;

use crate::ai::IdeasClient;
use crate::backend::BackendClient;
use crate::config::ServerConfig;
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store is the single injected state
/// object the whole application mutates through; nothing else holds entity
/// collections.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Store,
    ideas: Option<IdeasClient>,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Constructs the backend client and AI client for whichever sections
    /// are configured; missing sections leave those subsystems absent
    /// rather than failing.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let backend = config.backend.as_ref().map(BackendClient::new);
        let ideas = config.ai.as_ref().map(IdeasClient::new);
        let store = Store::new(backend, config.default_company_id);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                ideas,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the application store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get the generative client, when configured.
    #[must_use]
    pub fn ideas(&self) -> Option<&IdeasClient> {
        self.inner.ideas.as_ref()
    }
}
