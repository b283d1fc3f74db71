//! Snapshot Module
//!
//! Full, point-in-time dumps of a [`Store`](crate::Store) to a file.
//!
//! ## Responsibilities
//! - Write every entry of a store under its read lock
//! - Rebuild a store from a snapshot file
//! - Pick gzip or plain text from the file name alone
//! - Replace the target file atomically (unless asked not to)
//!
//! ## File Format
//! ```text
//! {
//!  "<key1>": "<value1 as JSON text>",
//!  "<key2>": "<value2 as JSON text>"
//! }
//! ```
//! A flat JSON object from key to the *text* of each encoded value. Written
//! with one-space indentation, keys sorted, trailing newline. Any valid JSON
//! of this shape is accepted on load. A `.gz` suffix on the path wraps the
//! whole document in gzip.

mod compression;
mod reader;
mod writer;

pub(crate) use compression::check_level;
pub use compression::{Compression, GZIP_SUFFIX};
pub use reader::{load, read_snapshot};
pub use writer::{save, write_snapshot, SnapshotInfo, SnapshotWriter};
