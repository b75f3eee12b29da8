//! JSON snapshot codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Snapshot;
use crate::error::{CacheError, Result};
use crate::snapshot::SnapshotCodec;

/// Encodes snapshots as a JSON object keyed by cache key.
///
/// JSON has no representation for non-finite floats and serde_json writes
/// them as `null`, so every encoded snapshot is decoded once before it is
/// returned. Output that would not load back is reported as an encode error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SnapshotCodec for JsonCodec {
    fn encode<V: Serialize + DeserializeOwned>(&self, snapshot: &Snapshot<V>) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(snapshot).map_err(|e| CacheError::Encode(e.to_string()))?;
        serde_json::from_slice::<Snapshot<V>>(&bytes)
            .map_err(|e| CacheError::Encode(format!("snapshot would not load back: {}", e)))?;
        Ok(bytes)
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Snapshot<V>> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}
