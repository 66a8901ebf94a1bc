//! Document store contract.
//!
//! The store is a remote key/value collaborator with three operations. Reads
//! return a tagged [`ReadOutcome`] so callers dispatch on "missing" vs "broken"
//! explicitly instead of inspecting error kinds.

use async_trait::async_trait;

use crate::error::{CounterError, Result};
use crate::record::CounterRecord;

/// Result of a point read.
#[derive(Debug)]
pub enum ReadOutcome {
    Found(CounterRecord),
    /// No record under this id/partition key. Expected on first use.
    NotFound,
    Failure(CounterError),
}

impl ReadOutcome {
    /// Collapse into `Result<Option<_>>` for callers that want `?`.
    pub fn into_result(self) -> Result<Option<CounterRecord>> {
        match self {
            ReadOutcome::Found(rec) => Ok(Some(rec)),
            ReadOutcome::NotFound => Ok(None),
            ReadOutcome::Failure(e) => Err(e),
        }
    }
}

impl From<Result<Option<CounterRecord>>> for ReadOutcome {
    fn from(res: Result<Option<CounterRecord>>) -> Self {
        match res {
            Ok(Some(rec)) => ReadOutcome::Found(rec),
            Ok(None) => ReadOutcome::NotFound,
            Err(e) => ReadOutcome::Failure(e),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and metrics labels.
    fn name(&self) -> &'static str;

    async fn read(&self, id: &str, partition_key: &str) -> ReadOutcome;

    /// Insert a new record. Fails with [`CounterError::Conflict`] if the id exists.
    async fn create(&self, record: &CounterRecord) -> Result<()>;

    /// Insert-or-replace by id.
    async fn upsert(&self, record: &CounterRecord) -> Result<()>;
}
