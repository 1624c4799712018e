//! # Worker-state registry: a shared table of worker metadata.
//!
//! [`WorkerRegistry`] maps a worker identifier to [`WorkerInfo`]. It is
//! explicitly constructed by the top-level service bootstrap and handed by
//! reference to the supervisor and to worker entry points; nothing here is
//! module-level or implicit.
//!
//! The supervisor registers its own pid under [`MAIN_REGISTRY_KEY`] at
//! construction time so workers can discover it, and records each worker's
//! pid under the worker name when it starts.
//!
//! ## Rules
//! - Writes originate from the supervising task only (construction, start,
//!   restart); reads are read-mostly.
//! - Handles are cheap to clone; every clone shares the same table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Reserved key under which the supervisor publishes its own pid.
pub const MAIN_REGISTRY_KEY: &str = "Procvisor-Main";

/// Metadata recorded for one worker (or for the supervisor itself).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerInfo {
    /// Pid of the process serving this entry.
    pub pid: u32,
}

/// Shared key-value table of worker metadata.
#[derive(Clone, Debug, Default)]
pub struct WorkerRegistry {
    inner: Arc<RwLock<HashMap<String, WorkerInfo>>>,
}

impl WorkerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&self, key: impl Into<String>, info: WorkerInfo) {
        self.inner.write().insert(key.into(), info);
    }

    /// Looks up the entry for `key`.
    pub fn get(&self, key: &str) -> Option<WorkerInfo> {
        self.inner.read().get(key).copied()
    }

    /// Removes the entry for `key`, returning it if present.
    pub fn remove(&self, key: &str) -> Option<WorkerInfo> {
        self.inner.write().remove(key)
    }

    /// Returns the sorted list of registered keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_table() {
        let registry = WorkerRegistry::new();
        let other = registry.clone();

        registry.insert("Worker-0", WorkerInfo { pid: 100 });
        assert_eq!(other.get("Worker-0"), Some(WorkerInfo { pid: 100 }));

        other.remove("Worker-0");
        assert_eq!(registry.get("Worker-0"), None);
    }

    #[test]
    fn keys_are_sorted() {
        let registry = WorkerRegistry::new();
        registry.insert("Worker-1", WorkerInfo { pid: 2 });
        registry.insert(MAIN_REGISTRY_KEY, WorkerInfo { pid: 1 });
        registry.insert("Worker-0", WorkerInfo { pid: 3 });

        assert_eq!(
            registry.keys(),
            vec![
                MAIN_REGISTRY_KEY.to_string(),
                "Worker-0".to_string(),
                "Worker-1".to_string()
            ]
        );
    }
}
