//! Store decorator recording per-operation latency and outcome.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use vcounter_core::error::Result;
use vcounter_core::record::CounterRecord;
use vcounter_core::store::{DocumentStore, ReadOutcome};

use crate::obs::metrics::ServiceMetrics;

/// Wraps a backend, timing each round-trip into `store_duration`.
pub struct InstrumentedStore {
    inner: Arc<dyn DocumentStore>,
    metrics: Arc<ServiceMetrics>,
}

impl InstrumentedStore {
    pub fn new(inner: Arc<dyn DocumentStore>, metrics: Arc<ServiceMetrics>) -> Self {
        Self { inner, metrics }
    }

    fn record(&self, op: &str, result: &str, started: Instant) {
        let elapsed = started.elapsed();
        self.metrics
            .store_duration
            .observe(&[("op", op), ("result", result)], elapsed);
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        tracing::debug!(backend = self.inner.name(), op, result, elapsed_us, "store op");
    }

    fn record_write(&self, op: &str, res: &Result<()>, started: Instant) {
        self.record(op, if res.is_ok() { "ok" } else { "error" }, started);
    }
}

#[async_trait]
impl DocumentStore for InstrumentedStore {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn read(&self, id: &str, partition_key: &str) -> ReadOutcome {
        let started = Instant::now();
        let out = self.inner.read(id, partition_key).await;
        let result = match &out {
            ReadOutcome::Found(_) => "found",
            ReadOutcome::NotFound => "not_found",
            ReadOutcome::Failure(_) => "error",
        };
        self.record("read", result, started);
        out
    }

    async fn create(&self, record: &CounterRecord) -> Result<()> {
        let started = Instant::now();
        let res = self.inner.create(record).await;
        self.record_write("create", &res, started);
        res
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<()> {
        let started = Instant::now();
        let res = self.inner.upsert(record).await;
        self.record_write("upsert", &res, started);
        res
    }
}
