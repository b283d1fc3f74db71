//! Compression selection
//!
//! The compression mode is a pure function of the file name, so load and
//! save of the same path always agree.

use std::fmt;
use std::path::Path;

use crate::error::{KvError, Result};

/// Suffix selecting gzip compression (case-sensitive)
pub const GZIP_SUFFIX: &str = ".gz";

/// Highest gzip level accepted
pub(crate) const MAX_LEVEL: u32 = 9;

/// How snapshot bytes are framed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain JSON text
    Plain,

    /// Gzip-compressed JSON text
    Gzip,
}

impl Compression {
    /// Pick the mode for `path`: `.gz` → gzip, anything else → plain
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        if path.as_ref().to_string_lossy().ends_with(GZIP_SUFFIX) {
            Compression::Gzip
        } else {
            Compression::Plain
        }
    }

    pub fn is_compressed(self) -> bool {
        self == Compression::Gzip
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Plain => f.write_str("plain"),
            Compression::Gzip => f.write_str("gzip"),
        }
    }
}

/// Reject gzip levels flate2 does not define
pub(crate) fn check_level(level: u32) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(KvError::Config(format!(
            "compression level must be 0-{}, got {}",
            MAX_LEVEL, level
        )));
    }
    Ok(())
}
