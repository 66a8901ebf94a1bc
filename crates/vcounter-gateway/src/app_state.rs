//! Shared application state.
//!
//! The store client is built once here and handed to every request through
//! axum's `State` extractor; there is no global client.

use std::sync::Arc;

use vcounter_core::error::Result;
use vcounter_core::store::DocumentStore;
use vcounter_core::VisitorCounter;

use crate::config::ServiceConfig;
use crate::obs::metrics::ServiceMetrics;
use crate::store::{self, InstrumentedStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    counter: VisitorCounter,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Build the configured store backend and wire it in.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        let backend = store::build(&cfg.store)?;
        tracing::info!(backend = backend.name(), "document store ready");
        Ok(Self::with_store(cfg, backend))
    }

    /// Wire an already-constructed store (tests, embedding).
    pub fn with_store(cfg: ServiceConfig, backend: Arc<dyn DocumentStore>) -> Self {
        let metrics = Arc::new(ServiceMetrics::default());
        let instrumented: Arc<dyn DocumentStore> =
            Arc::new(InstrumentedStore::new(backend, Arc::clone(&metrics)));

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                counter: VisitorCounter::new(instrumented),
                metrics,
            }),
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn counter(&self) -> &VisitorCounter {
        &self.inner.counter
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
