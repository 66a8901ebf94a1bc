//! Process-local `DashMap` document store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use async_trait::async_trait;

use vcounter_core::error::{CounterError, Result};
use vcounter_core::record::CounterRecord;
use vcounter_core::store::{DocumentStore, ReadOutcome};

/// Process-local store for development and tests. Same conflict rules as Cosmos.
#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<String, CounterRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: CounterRecord) {
        self.docs.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<CounterRecord> {
        self.docs.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, id: &str, _partition_key: &str) -> ReadOutcome {
        match self.get(id) {
            Some(rec) => ReadOutcome::Found(rec),
            None => ReadOutcome::NotFound,
        }
    }

    async fn create(&self, record: &CounterRecord) -> Result<()> {
        match self.docs.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(CounterError::Conflict(format!(
                "id '{}' already exists",
                record.id
            ))),
            Entry::Vacant(v) => {
                v.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<()> {
        self.insert(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn create_twice_conflicts() {
        let store = MemoryStore::new();
        let rec = CounterRecord::empty("visitor-counter");

        store.create(&rec).await.unwrap();
        let err = store.create(&rec).await.unwrap_err();

        assert_eq!(err.client_code().as_str(), "CONFLICT");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn upsert_same_record_twice_is_stable() {
        let store = MemoryStore::new();
        let rec = CounterRecord::new("visitor-counter", 3);

        store.upsert(&rec).await.unwrap();
        let once = store.get("visitor-counter");
        store.upsert(&rec).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("visitor-counter"), once);
        assert_eq!(once, Some(rec));
    }

    #[tokio::test]
    async fn upsert_replaces() {
        let store = MemoryStore::new();
        store.upsert(&CounterRecord::new("visitor-counter", 2)).await.unwrap();
        store.upsert(&CounterRecord::new("visitor-counter", 3)).await.unwrap();

        match store.read("visitor-counter", "visitor-counter").await {
            ReadOutcome::Found(rec) => assert_eq!(rec.count, 3),
            other => panic!("unexpected {other:?}"),
        }
    }
}
