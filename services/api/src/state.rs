//! Application state shared across request handlers.

use std::sync::Arc;

use crate::assignment::AssignmentEngine;
use crate::store::{AssignmentStore, IdentityStore};

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn AssignmentStore>,
    identities: Arc<dyn IdentityStore>,
    engine: AssignmentEngine,
}

impl AppState {
    /// Create application state over a store that serves both assignments
    /// and identities.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: AssignmentStore + IdentityStore + 'static,
    {
        let identities: Arc<dyn IdentityStore> = store.clone();
        let store: Arc<dyn AssignmentStore> = store;
        Self {
            inner: Arc::new(AppStateInner {
                engine: AssignmentEngine::new(store.clone()),
                store,
                identities,
            }),
        }
    }

    pub fn store(&self) -> &dyn AssignmentStore {
        self.inner.store.as_ref()
    }

    pub fn identities(&self) -> &dyn IdentityStore {
        self.inner.identities.as_ref()
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.inner.engine
    }
}
