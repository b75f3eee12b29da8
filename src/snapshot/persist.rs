//! Snapshot save/load for [`Cache`].
//!
//! Both operations hold the exclusive lock for their entire duration,
//! stream I/O included, so a snapshot is serialized with every other cache
//! operation.

use std::path::Path;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::Result;
use crate::snapshot::SnapshotCodec;

impl<V, C> Cache<V, C>
where
    V: Clone + Send + Sync + 'static,
    C: SnapshotCodec,
{
    // == Save ==
    /// Writes every stored entry, expired ones included, to `writer`.
    ///
    /// # Errors
    /// * [`crate::CacheError::Encode`] - a value could not be serialized
    /// * [`crate::CacheError::Io`] - the write failed; bytes already written
    ///   are not rolled back
    pub async fn save<W>(&self, writer: &mut W) -> Result<()>
    where
        V: Serialize + DeserializeOwned,
        W: AsyncWrite + Unpin,
    {
        let store = self.inner.store.write().await;

        let bytes = self.inner.codec.encode(store.entries()).map_err(|e| {
            warn!("Snapshot save failed: {}", e);
            e
        })?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;

        debug!(entries = store.len(), bytes = bytes.len(), "Snapshot saved");
        Ok(())
    }

    /// Creates (or truncates) the file at `path` and saves a snapshot into it.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()>
    where
        V: Serialize + DeserializeOwned,
    {
        let mut file = File::create(path.as_ref()).await?;
        self.save(&mut file).await
    }

    // == Load ==
    /// Reads a snapshot from `reader` and merges it into the cache.
    ///
    /// A snapshot entry is adopted when its key is absent or holds an expired
    /// entry; live entries in the cache are kept. Returns the number of
    /// adopted entries.
    ///
    /// # Errors
    /// * [`crate::CacheError::Decode`] - the stream is malformed or truncated;
    ///   the cache is left unchanged
    /// * [`crate::CacheError::Io`] - the read failed; the cache is left unchanged
    pub async fn load<R>(&self, reader: &mut R) -> Result<usize>
    where
        V: DeserializeOwned,
        R: AsyncRead + Unpin,
    {
        let mut store = self.inner.store.write().await;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let snapshot = self.inner.codec.decode::<V>(&bytes).map_err(|e| {
            warn!("Snapshot load failed: {}", e);
            e
        })?;

        let decoded = snapshot.len();
        let adopted = store.merge(snapshot, Utc::now());

        debug!(decoded, adopted, "Snapshot loaded");
        Ok(adopted)
    }

    /// Opens the file at `path` and loads a snapshot from it.
    pub async fn load_from_file(&self, path: impl AsRef<Path>) -> Result<usize>
    where
        V: DeserializeOwned,
    {
        let mut file = File::open(path.as_ref()).await?;
        self.load(&mut file).await
    }
}
