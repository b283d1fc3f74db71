//! Raw value
//!
//! An already-encoded JSON value, held as an immutable byte buffer.
//!
//! Values are encoded once on `Store::set` and decoded only when a caller
//! asks for a concrete type on `Store::get`. One store can therefore hold
//! differently shaped values under different keys, and a snapshot round trip
//! carries untouched values through byte for byte.

mod finite;

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;

use crate::error::{KvError, Result};

/// Opaque, immutable encoded value.
///
/// Always valid UTF-8: it is either `serde_json` output or a string taken
/// verbatim from a snapshot file. Cloning shares the underlying buffer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawValue(Bytes);

impl RawValue {
    /// Encode a caller value as JSON
    ///
    /// Fails on anything JSON cannot represent, including NaN and infinite
    /// floats (which serde_json would otherwise write as `null`).
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let text = serde_json::to_string(value).map_err(KvError::Encoding)?;

        // A non-finite float can only hide behind a `null` in the output
        if text.contains("null") {
            finite::check(value).map_err(|e| KvError::Encoding(serde_json::Error::custom(e)))?;
        }

        Ok(Self(Bytes::from(text)))
    }

    /// Wrap snapshot text as-is. No check that it is valid JSON;
    /// that surfaces as a decoding error on first `get`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(Bytes::from(text.into()))
    }

    /// Decode into the caller's target shape
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Textual form, as written to snapshots
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawValue").field(&self.as_text()).finish()
    }
}
