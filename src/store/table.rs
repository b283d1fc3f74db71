//! Store implementation
//!
//! HashMap-based table with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KvError, Result};
use crate::value::RawValue;

use super::KeyPattern;

/// Thread-safe key → raw value table
///
/// ## Concurrency:
/// - `get`/`get_raw`/`get_all`/`keys`: shared read lock, run concurrently
/// - `set`/`delete`: exclusive write lock, exclude readers and writers
/// - Snapshot saves hold the read lock for the whole write-out,
///   so no mutation can interleave with a save
/// - All methods take `&self`; share a store across threads with `Arc<Store>`
#[derive(Debug, Default)]
pub struct Store {
    /// Key → encoded value. Never touched outside the lock.
    entries: RwLock<HashMap<String, RawValue>>,
}

impl Store {
    /// Create a new empty store.
    ///
    /// The map does not allocate until the first `set`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around already-decoded snapshot entries
    pub(crate) fn from_entries(entries: HashMap<String, RawValue>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Encode `value` and insert or replace the entry for `key`
    ///
    /// Encoding runs before the write lock is taken; on an encoding error
    /// the table is left untouched.
    pub fn set<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        let key = key.into();
        let raw = RawValue::encode(value)?;

        tracing::trace!(key = %key, bytes = raw.len(), "set");

        self.entries.write().insert(key, raw);
        Ok(())
    }

    /// Decode the value stored under `key` into `T`
    ///
    /// Returns:
    /// - `Err(NoSuchKey)` — key is absent
    /// - `Err(Decoding)` — stored value is not a valid encoding of `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let entries = self.entries.read();

        let raw = entries.get(key).ok_or_else(|| KvError::NoSuchKey {
            key: key.to_string(),
        })?;

        raw.decode().map_err(|source| KvError::Decoding {
            key: key.to_string(),
            source,
        })
    }

    /// Get the encoded value under `key` without decoding it
    pub fn get_raw(&self, key: &str) -> Option<RawValue> {
        self.entries.read().get(key).cloned()
    }

    /// Collect entries whose key matches `pattern` (`None` matches all)
    ///
    /// With `Some(limit)` at most `limit` entries are returned. Which ones
    /// survive the cut is unspecified; sort the keys yourself if it matters.
    pub fn get_all(
        &self,
        pattern: Option<&KeyPattern>,
        limit: Option<usize>,
    ) -> HashMap<String, RawValue> {
        let entries = self.entries.read();

        entries
            .iter()
            .filter(|(key, _)| pattern.map_or(true, |p| p.matches(key)))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(key, raw)| (key.clone(), raw.clone()))
            .collect()
    }

    /// All keys currently present, in no particular order
    ///
    /// Each key appears exactly once; the vector is a set in all but type.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Remove `key` if present
    ///
    /// Deleting an absent key is a no-op, not an error. Returns whether an
    /// entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        tracing::trace!(key = %key, removed, "delete");
        removed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Hold the read lock, for point-in-time snapshot writes
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<String, RawValue>> {
        self.entries.read()
    }
}
