use async_trait::async_trait;
use dashmap::DashMap;

use super::{entry_key, KeyValueStore};
use crate::error::Error;

/// In-memory store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, Error> {
        Ok(self
            .entries
            .get(&entry_key(namespace, key))
            .map(|entry| entry.value().clone()))
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .insert(entry_key(namespace, key), value.to_string());
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error> {
        self.entries.remove(&entry_key(namespace, key));
        Ok(())
    }
}
