//! The persisted counter document.

use serde::{Deserialize, Serialize};

/// Fixed id of the single counter document. Doubles as its partition key.
pub const COUNTER_ID: &str = "visitor-counter";

/// Wire shape: `{"id": "...", "count": N}`.
///
/// Unknown fields are ignored on decode so store-managed properties
/// (`_rid`, `_etag`, `_ts`, ...) pass through harmlessly. A missing `count`
/// decodes as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub id: String,
    #[serde(default)]
    pub count: u64,
}

impl CounterRecord {
    pub fn new(id: impl Into<String>, count: u64) -> Self {
        Self { id: id.into(), count }
    }

    /// Fresh record used when the store has nothing yet.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, 0)
    }

    /// Partition key the store routes this record by (same as the id).
    pub fn partition_key(&self) -> &str {
        &self.id
    }
}
