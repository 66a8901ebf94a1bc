//! Document store backends.
//!
//! - `cosmos`: Azure Cosmos DB REST client (production)
//! - `memory`: process-local map (development, tests)
//! - `instrumented`: latency/outcome metrics around either

pub mod auth;
pub mod cosmos;
pub mod instrumented;
pub mod memory;

use std::sync::Arc;

use vcounter_core::error::Result;
use vcounter_core::store::DocumentStore;

use crate::config::{StoreBackend, StoreSection};

pub use cosmos::CosmosStore;
pub use instrumented::InstrumentedStore;
pub use memory::MemoryStore;

/// Construct the configured backend. Called once at startup.
pub fn build(cfg: &StoreSection) -> Result<Arc<dyn DocumentStore>> {
    match cfg.backend {
        StoreBackend::Cosmos => Ok(Arc::new(CosmosStore::from_config(cfg)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
