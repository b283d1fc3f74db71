//! Snapshot Writer
//!
//! Writes a point-in-time copy of a store to a snapshot file.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, BufWriter, IntoInnerError, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::config::{Config, SaveMode, DEFAULT_COMPRESSION_LEVEL};
use crate::error::Result;
use crate::store::Store;
use crate::value::RawValue;

use super::compression::check_level;
use super::Compression;

/// Snapshot metadata returned by a successful write
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Path of the snapshot file
    pub path: PathBuf,
    /// Number of entries written
    pub entry_count: usize,
    /// Compression used (from the path suffix)
    pub compression: Compression,
    /// File size in bytes
    pub file_size: u64,
}

/// Save `store` to `path` with default settings (atomic replace, gzip level 6)
pub fn save(store: &Store, path: impl AsRef<Path>) -> Result<SnapshotInfo> {
    SnapshotWriter::new(path.as_ref()).write(store)
}

/// Writes snapshots of a store to one path
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    /// Target file path
    path: PathBuf,
    /// Atomic rename or in-place rewrite
    save_mode: SaveMode,
    /// Gzip level for `.gz` targets
    compression_level: u32,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_mode: SaveMode::Atomic,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Writer for the snapshot described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.snapshot_path.clone())
            .save_mode(config.save_mode)
            .compression_level(config.compression_level)
    }

    pub fn save_mode(mut self, mode: SaveMode) -> Self {
        self.save_mode = mode;
        self
    }

    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every entry of `store` to the target path
    ///
    /// The store's read lock is held for the whole call: readers carry on,
    /// writers wait until the file is complete.
    pub fn write(&self, store: &Store) -> Result<SnapshotInfo> {
        check_level(self.compression_level)?;

        let compression = Compression::from_path(&self.path);
        let entries = store.read();

        let file_size = match self.save_mode {
            SaveMode::Atomic => self.write_atomic(&entries, compression)?,
            SaveMode::InPlace => self.write_in_place(&entries, compression)?,
        };

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            %compression,
            bytes = file_size,
            mode = ?self.save_mode,
            "saved snapshot"
        );

        Ok(SnapshotInfo {
            path: self.path.clone(),
            entry_count: entries.len(),
            compression,
            file_size,
        })
    }

    /// Temp file in the target's directory, synced, then renamed over it
    fn write_atomic(
        &self,
        entries: &HashMap<String, RawValue>,
        compression: Compression,
    ) -> Result<u64> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir)?;

        // Keep the permissions of the snapshot being replaced
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }

        encode_entries(entries, temp.as_file(), compression, self.compression_level)?;
        temp.as_file().sync_all()?;

        let file = temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(file.metadata()?.len())
    }

    /// Truncate the target and write straight into it
    fn write_in_place(
        &self,
        entries: &HashMap<String, RawValue>,
        compression: Compression,
    ) -> Result<u64> {
        let file = File::create(&self.path)?;
        let file = encode_entries(entries, file, compression, self.compression_level)?;
        file.sync_all()?;
        Ok(file.metadata()?.len())
    }
}

/// Encode a snapshot of `store` into any writer
///
/// Holds the store's read lock while encoding. Returns the writer once every
/// byte (including the gzip trailer) has been handed to it.
pub fn write_snapshot<W: Write>(
    store: &Store,
    writer: W,
    compression: Compression,
    level: u32,
) -> Result<W> {
    check_level(level)?;
    let entries = store.read();
    Ok(encode_entries(&entries, writer, compression, level)?)
}

fn encode_entries<W: Write>(
    entries: &HashMap<String, RawValue>,
    writer: W,
    compression: Compression,
    level: u32,
) -> io::Result<W> {
    // Sorted so identical contents produce identical files
    let document: BTreeMap<&str, Cow<'_, str>> = entries
        .iter()
        .map(|(key, raw)| (key.as_str(), raw.as_text()))
        .collect();

    match compression {
        Compression::Plain => {
            let mut out = BufWriter::new(writer);
            write_document(&mut out, &document)?;
            out.into_inner().map_err(IntoInnerError::into_error)
        }
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(
                BufWriter::new(writer),
                flate2::Compression::new(level),
            );
            write_document(&mut encoder, &document)?;
            // finish() writes the gzip trailer before the file is synced
            let out = encoder.finish()?;
            out.into_inner().map_err(IntoInnerError::into_error)
        }
    }
}

fn write_document<W: Write>(out: &mut W, document: &BTreeMap<&str, Cow<'_, str>>) -> io::Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b" "));
    document.serialize(&mut serializer)?;
    out.write_all(b"\n")
}
