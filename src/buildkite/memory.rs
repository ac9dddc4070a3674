//! In-memory metadata store
//!
//! Behaves like build metadata for a single build. Records every write and
//! can be told to fail specific keys.

use crate::buildkite::MetadataStore;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    values: HashMap<String, String>,
    writes: Vec<String>,
    failing_gets: HashSet<String>,
    failing_sets: HashSet<String>,
}

/// Metadata store held in process memory
#[derive(Default)]
pub struct MemoryMetadata {
    state: Mutex<State>,
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording it as a write
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.lock().values.insert(key.to_string(), value.to_string());
        self
    }

    /// Make every `get` of `key` fail
    pub fn fail_get(&self, key: &str) {
        self.lock().failing_gets.insert(key.to_string());
    }

    /// Make every `set` of `key` fail
    pub fn fail_set(&self, key: &str) {
        self.lock().failing_sets.insert(key.to_string());
    }

    /// Current value of `key`, if set
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Keys in the order they were successfully written
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadata {
    async fn get(&self, key: &str, default: &str) -> SyncResult<String> {
        let state = self.lock();
        if state.failing_gets.contains(key) {
            return Err(SyncError::tool(
                format!("meta-data get {}", key),
                "simulated read failure",
            ));
        }
        Ok(state
            .values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        let mut state = self.lock();
        if state.failing_sets.contains(key) {
            return Err(SyncError::tool(
                format!("meta-data set {}", key),
                "simulated write failure",
            ));
        }
        state.values.insert(key.to_string(), value.to_string());
        state.writes.push(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_default_when_unset() {
        let store = MemoryMetadata::new();
        assert_eq!(store.get("missing", "false").await.unwrap(), "false");
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryMetadata::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k", "").await.unwrap(), "v");
        assert_eq!(store.writes(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn seeded_values_are_not_writes() {
        let store = MemoryMetadata::new().with_value("k", "v");
        assert_eq!(store.value("k").as_deref(), Some("v"));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryMetadata::new();
        store.fail_set("k");
        store.fail_get("k");
        assert!(store.set("k", "v").await.is_err());
        assert!(store.get("k", "").await.is_err());
        assert!(store.value("k").is_none());
    }
}
