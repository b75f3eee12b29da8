//! Bincode snapshot codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Snapshot;
use crate::error::{CacheError, Result};
use crate::snapshot::SnapshotCodec;

/// Encodes snapshots with bincode's positional binary format.
///
/// Smaller and faster than JSON, but the value type's field layout must not
/// change between save and load.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl SnapshotCodec for BincodeCodec {
    fn encode<V: Serialize + DeserializeOwned>(&self, snapshot: &Snapshot<V>) -> Result<Vec<u8>> {
        bincode::serialize(snapshot).map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Snapshot<V>> {
        bincode::deserialize(bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}
