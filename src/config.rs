//! Configuration for jsonkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a jsonkv [`Engine`](crate::Engine)
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Snapshot file backing the store.
    /// A `.gz` suffix selects gzip compression for both load and save.
    pub snapshot_path: PathBuf,

    /// How saves replace the snapshot file
    pub save_mode: SaveMode,

    /// Gzip level (0-9), only used for `.gz` snapshots
    pub compression_level: u32,

    // -------------------------------------------------------------------------
    // Lifecycle Configuration
    // -------------------------------------------------------------------------
    /// Start with an empty store when the snapshot file does not exist
    pub create_if_missing: bool,

    /// Save on `Engine::close` if there are unsaved changes
    pub save_on_close: bool,
}

/// Save strategy: how the snapshot file is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Write a temp file next to the target, then rename over it.
    /// A failed save leaves the previous snapshot untouched.
    #[default]
    Atomic,

    /// Truncate and rewrite the target directly.
    /// A failed save can leave a truncated file behind.
    InPlace,
}

/// Default gzip level, matching flate2's `Compression::default()`
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./jsonkv.json"),
            save_mode: SaveMode::Atomic,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            create_if_missing: true,
            save_on_close: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot file path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Set the save strategy
    pub fn save_mode(mut self, mode: SaveMode) -> Self {
        self.config.save_mode = mode;
        self
    }

    /// Set the gzip compression level (0-9)
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Whether a missing snapshot file starts an empty store
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Whether `Engine::close` saves pending changes
    pub fn save_on_close(mut self, save: bool) -> Self {
        self.config.save_on_close = save;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
