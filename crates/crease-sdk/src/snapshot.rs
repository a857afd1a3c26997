//! Scorebook persistence.
//!
//! Two forms are supported: pretty JSON for people and tools, and a compact
//! binary blob laid out as
//!
//! ```text
//! magic (8) | format version (u16 LE) | BLAKE3 of payload (32) | bincode payload
//! ```
//!
//! The checksum covers the payload only; the header is checked field by field.

use tracing::debug;

use crate::error::{SdkError, SdkResult};
use crate::scorebook::Scorebook;

pub const SNAPSHOT_MAGIC: [u8; 8] = *b"CREASEBK";
pub const SNAPSHOT_VERSION: u16 = 1;
const HEADER_LEN: usize = 8 + 2 + 32;

impl Scorebook {
    pub fn export_json(&self) -> SdkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SdkError::Serialization(e.to_string()))
    }

    pub fn import_json(text: &str) -> SdkResult<Self> {
        serde_json::from_str(text).map_err(|e| SdkError::Snapshot(e.to_string()))
    }

    pub fn to_blob(&self) -> SdkResult<Vec<u8>> {
        let payload =
            bincode::serialize(self).map_err(|e| SdkError::Serialization(e.to_string()))?;
        let checksum = blake3::hash(&payload);

        let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
        blob.extend_from_slice(&SNAPSHOT_MAGIC);
        blob.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        blob.extend_from_slice(checksum.as_bytes());
        blob.extend_from_slice(&payload);
        debug!(bytes = blob.len(), matches = self.matches().len(), "scorebook encoded");
        Ok(blob)
    }

    pub fn from_blob(blob: &[u8]) -> SdkResult<Self> {
        if blob.len() < HEADER_LEN {
            return Err(SdkError::Snapshot(format!(
                "blob is {} bytes, shorter than the {HEADER_LEN}-byte header",
                blob.len()
            )));
        }
        let (magic, rest) = blob.split_at(8);
        if magic != SNAPSHOT_MAGIC {
            return Err(SdkError::Snapshot("not a scorebook snapshot".into()));
        }
        let (version, rest) = rest.split_at(2);
        let version = u16::from_le_bytes([version[0], version[1]]);
        if version != SNAPSHOT_VERSION {
            return Err(SdkError::Snapshot(format!(
                "unsupported snapshot version {version}"
            )));
        }
        let (checksum, payload) = rest.split_at(32);
        if blake3::hash(payload).as_bytes() != checksum {
            return Err(SdkError::Snapshot("checksum mismatch".into()));
        }

        let book: Self =
            bincode::deserialize(payload).map_err(|e| SdkError::Snapshot(e.to_string()))?;
        debug!(bytes = blob.len(), matches = book.matches().len(), "scorebook decoded");
        Ok(book)
    }
}
