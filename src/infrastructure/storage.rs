//! Storage implementations for ledger accounts.
//!
//! Provides concurrent, sharded storage for the per-account velocity state.

use crate::application::gate::LoadGate;
use crate::application::ledger::VelocityLedger;
use crate::application::ports::Storage;
use crate::domain::buckets::AccountHistory;
use crate::domain::load::CustomerKey;
use dashmap::DashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Thread-safe sharded storage backed by DashMap.
///
/// The map holds one handle per key; the handle owns the mutex that
/// serializes an admission transaction. Map shards are only locked long
/// enough to clone a handle out, never across a decision.
#[derive(Debug)]
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, Arc<Mutex<V>>, ahash::RandomState>,
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Check if a key has state.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get the number of keys with state.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

// Implement the Storage port
impl<K, V> Storage<K, V> for ShardedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + Debug,
    V: Default + Send + Debug,
{
    fn handle(&self, key: &K) -> Arc<Mutex<V>> {
        let handle = self.map.entry(key.clone()).or_default();
        Arc::clone(&handle)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A load gate wired to the in-memory sharded store.
pub type InMemoryGate = LoadGate<ShardedStorage<CustomerKey, AccountHistory>>;

/// Build a gate over a fresh, empty in-memory ledger.
pub fn in_memory_gate() -> InMemoryGate {
    LoadGate::new(VelocityLedger::new(Arc::new(ShardedStorage::new())))
}
