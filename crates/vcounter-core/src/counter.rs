//! Read, increment, write.
//!
//! Per request:
//! - read the record; found => `Loaded(count)`
//! - not found => create `{count: 0}` => `Loaded(0)`
//! - anything else => fail without touching the store again
//! - `Loaded(n)` => upsert `n + 1` => done
//!
//! The sequence is not atomic. Two concurrent calls may read the same count and
//! one increment is lost. No retries happen here; the caller re-issues the
//! request.

use std::sync::Arc;

use crate::error::{CounterError, Result};
use crate::record::{CounterRecord, COUNTER_ID};
use crate::store::{DocumentStore, ReadOutcome};

#[derive(Clone)]
pub struct VisitorCounter {
    store: Arc<dyn DocumentStore>,
    id: &'static str,
}

impl VisitorCounter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, id: COUNTER_ID }
    }

    /// Bump the counter and return the new value.
    pub async fn increment(&self) -> Result<u64> {
        let mut record = self.load_or_create().await?;

        record.count = record
            .count
            .checked_add(1)
            .ok_or_else(|| CounterError::Internal("visitor count overflow".into()))?;

        self.store.upsert(&record).await?;
        tracing::debug!(id = %record.id, count = record.count, "counter persisted");
        Ok(record.count)
    }

    /// Current value without mutating anything. Missing record reads as 0.
    pub async fn peek(&self) -> Result<u64> {
        let rec = self.store.read(self.id, self.id).await.into_result()?;
        Ok(rec.map(|r| r.count).unwrap_or(0))
    }

    async fn load_or_create(&self) -> Result<CounterRecord> {
        match self.store.read(self.id, self.id).await {
            ReadOutcome::Found(rec) => Ok(rec),
            ReadOutcome::NotFound => {
                tracing::info!(id = self.id, "counter record missing, creating");
                let rec = CounterRecord::empty(self.id);
                self.store.create(&rec).await?;
                Ok(rec)
            }
            ReadOutcome::Failure(e) => Err(e),
        }
    }
}
