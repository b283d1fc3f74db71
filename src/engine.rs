//! Engine Module
//!
//! Binds one store to one snapshot file.
//!
//! ## Responsibilities
//! - Load the snapshot on open, or start empty
//! - Track whether memory has diverged from disk
//! - Save on demand and on close

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::snapshot::{self, SnapshotInfo, SnapshotWriter};
use crate::store::{KeyPattern, Store};
use crate::value::RawValue;

/// A store plus the snapshot file it persists to
///
/// ## Concurrency Model
/// Everything goes through the inner [`Store`]'s RwLock; the engine adds
/// only an atomic dirty flag. Share with `Arc<Engine>`.
///
/// Mutations made through [`Engine::store`] directly bypass dirty tracking.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The in-memory table
    store: Store,

    /// Snapshot writer built from `config`
    writer: SnapshotWriter,

    /// Set on every successful mutation, cleared by a successful save
    dirty: AtomicBool,
}

impl Engine {
    /// Open the snapshot at `config.snapshot_path`
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Load the snapshot if it exists
    /// 3. Otherwise start empty (or fail if `create_if_missing` is off)
    pub fn open(config: Config) -> Result<Self> {
        snapshot::check_level(config.compression_level)?;

        let path = &config.snapshot_path;
        let store = if path.exists() || !config.create_if_missing {
            snapshot::load(path)?
        } else {
            tracing::debug!(path = %path.display(), "no snapshot, starting empty");
            Store::new()
        };

        let writer = SnapshotWriter::from_config(&config);

        Ok(Self {
            config,
            store,
            writer,
            dirty: AtomicBool::new(false),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified snapshot path
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().snapshot_path(path.as_ref()).build();
        Self::open(config)
    }

    /// Encode and store `value` under `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        self.store.set(key, value)?;
        self.mark_dirty();
        Ok(())
    }

    /// Decode the value under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.store.get(key)
    }

    pub fn get_raw(&self, key: &str) -> Option<RawValue> {
        self.store.get_raw(key)
    }

    pub fn get_all(
        &self,
        pattern: Option<&KeyPattern>,
        limit: Option<usize>,
    ) -> HashMap<String, RawValue> {
        self.store.get_all(pattern, limit)
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    /// Delete `key`; only an actual removal marks the engine dirty
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.store.delete(key);
        if removed {
            self.mark_dirty();
        }
        removed
    }

    /// Write the snapshot now
    ///
    /// The dirty flag is cleared before the store is locked, so a write that
    /// races with the save is at worst saved twice, never lost.
    pub fn save(&self) -> Result<SnapshotInfo> {
        let was_dirty = self.dirty.swap(false, Ordering::SeqCst);

        match self.save_internal() {
            Ok(info) => Ok(info),
            Err(e) => {
                if was_dirty {
                    self.mark_dirty();
                }
                Err(e)
            }
        }
    }

    /// Save only if something changed since the last load or save
    pub fn save_if_dirty(&self) -> Result<Option<SnapshotInfo>> {
        if !self.is_dirty() {
            return Ok(None);
        }
        self.save().map(Some)
    }

    /// Close the engine
    ///
    /// Saves pending changes when `save_on_close` is set
    pub fn close(self) -> Result<()> {
        if self.config.save_on_close {
            self.save_if_dirty()?;
        }
        Ok(())
    }

    fn save_internal(&self) -> Result<SnapshotInfo> {
        if let Some(parent) = self.config.snapshot_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.writer.write(&self.store)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Whether there are changes not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Get the snapshot file path
    pub fn snapshot_path(&self) -> &Path {
        &self.config.snapshot_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
