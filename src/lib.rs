//! # jsonkv
//!
//! A process-local, persistent key-value store with:
//! - Values of any serde-serializable shape, stored pre-encoded as JSON
//! - Single-writer/multi-reader concurrency model
//! - Full snapshots to a JSON file, gzip-compressed for `.gz` paths
//! - Atomic snapshot replacement
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                              │
//! │          (Config, dirty tracking, save on close)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Store    │◀─────────│  Snapshot   │
//!   │  (RwLock)   │          │ (JSON / gz) │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │  RawValue   │
//!   │ (encoded)   │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jsonkv::{snapshot, Store};
//!
//! # fn main() -> jsonkv::Result<()> {
//! let store = Store::new();
//! store.set("hello", "world")?;
//! snapshot::save(&store, "out.json")?;
//!
//! let loaded = snapshot::load("out.json")?;
//! let value: String = loaded.get("hello")?;
//! assert_eq!(value, "world");
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod store;
pub mod snapshot;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, SaveMode};
pub use value::RawValue;
pub use store::{KeyPattern, Store};
pub use snapshot::{load, save, Compression, SnapshotInfo};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
