//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the
//! application layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Port for concurrent keyed storage of ledger accounts.
///
/// Each key owns one mutex-guarded value. `handle` returns a clone of the
/// owning handle so callers can serialize a multi-key admission transaction
/// without holding any map-internal lock across it.
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Default + Send,
{
    /// Fetch the handle for `key`, creating an empty value on first use.
    fn handle(&self, key: &K) -> Arc<Mutex<V>>;

    /// Number of keys with state.
    fn len(&self) -> usize;

    /// Check if no key has state.
    fn is_empty(&self) -> bool;
}
