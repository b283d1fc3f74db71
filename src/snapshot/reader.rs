//! Snapshot Reader
//!
//! Rebuilds a store from a snapshot file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{KvError, Result};
use crate::store::Store;
use crate::value::RawValue;

use super::Compression;

/// Load a snapshot file into a new store
///
/// Compression is chosen from the file name. Values are taken verbatim as
/// raw values; whether they decode into any particular type is only checked
/// on `get`.
///
/// Errors:
/// - `Io` — the file cannot be opened or read
/// - `Format` — bad gzip stream, or not a JSON object of strings
pub fn load(path: impl AsRef<Path>) -> Result<Store> {
    let path = path.as_ref();
    let compression = Compression::from_path(path);

    let file = File::open(path)?;
    let store = read_snapshot(BufReader::new(file), compression)?;

    tracing::debug!(
        path = %path.display(),
        entries = store.len(),
        %compression,
        "loaded snapshot"
    );

    Ok(store)
}

/// Decode a snapshot from any reader
pub fn read_snapshot<R: Read>(mut reader: R, compression: Compression) -> Result<Store> {
    let mut data = Vec::new();

    match compression {
        Compression::Plain => {
            reader.read_to_end(&mut data)?;
        }
        Compression::Gzip => {
            MultiGzDecoder::new(reader)
                .read_to_end(&mut data)
                .map_err(gzip_error)?;
        }
    }

    let decoded: HashMap<String, String> = serde_json::from_slice(&data).map_err(|e| {
        KvError::Format(format!("expected an object of string values: {}", e))
    })?;

    let entries = decoded
        .into_iter()
        .map(|(key, text)| (key, RawValue::from_text(text)))
        .collect();

    Ok(Store::from_entries(entries))
}

/// flate2 reports corrupt or truncated streams as these kinds;
/// anything else came from the underlying reader
fn gzip_error(err: io::Error) -> KvError {
    match err.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            KvError::Format(format!("invalid gzip stream: {}", err))
        }
        _ => KvError::Io(err),
    }
}
