//! Snapshot Module
//!
//! Codecs that turn the full entry mapping into bytes and back.
//!
//! # Codecs
//! - [`JsonCodec`]: serde_json, the default
//! - [`BincodeCodec`]: compact bincode encoding

mod binary;
mod json;
mod persist;

pub use binary::BincodeCodec;
pub use json::JsonCodec;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Snapshot;
use crate::error::Result;

// == Snapshot Codec ==
/// Serializes and deserializes a cache snapshot.
///
/// The stored value type is registered with the codec through its serde
/// implementations; any `V: Serialize + DeserializeOwned` can be persisted.
/// `decode` must accept exactly what `encode` produced and reject malformed
/// or truncated input with [`crate::error::CacheError::Decode`]. An encoder
/// that cannot represent a value faithfully must fail with
/// [`crate::error::CacheError::Encode`] instead of writing lossy output.
pub trait SnapshotCodec: Send + Sync + 'static {
    /// Encodes every entry, including expired ones, into bytes.
    ///
    /// The decode bound lets an encoder verify its output loads back.
    fn encode<V: Serialize + DeserializeOwned>(&self, snapshot: &Snapshot<V>) -> Result<Vec<u8>>;

    /// Decodes bytes produced by [`SnapshotCodec::encode`].
    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Snapshot<V>>;
}
