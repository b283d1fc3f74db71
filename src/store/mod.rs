//! Store Module
//!
//! Thread-safe in-memory table from string key to raw value.
//!
//! ## Responsibilities
//! - Encode values on set, decode on get
//! - Single-writer/multi-reader access pattern
//! - Key enumeration with optional pattern and limit
//!
//! ## Data Structure Choice
//! `HashMap` wrapped in a `parking_lot::RwLock`:
//! - Key order is not significant, snapshots sort on write
//! - Any number of concurrent readers, one exclusive writer
//! - Each `Store` owns its own lock, so independent stores never contend

mod pattern;
mod table;

pub use pattern::KeyPattern;
pub use table::Store;
