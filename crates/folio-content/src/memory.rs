use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use folio_types::ContentId;
use serde_json::Value;

use crate::error::{ContentError, ContentResult};
use crate::traits::ContentStore;

/// Prefix of ids minted by [`InMemoryContentStore`].
const CID_PREFIX: &str = "bafk";

/// Derive the content id for a blob: a BLAKE3 digest of the bytes.
pub fn content_id_for(data: &[u8]) -> ContentId {
    let digest = blake3::hash(data);
    ContentId::new(format!("{CID_PREFIX}{}", digest.to_hex()))
        .expect("hex digest is never empty")
}

/// In-memory, content-addressed store.
///
/// Intended for tests, demos and the local gateway. Blobs are held behind a
/// `RwLock`; identical content always maps to the same id, so writes are
/// idempotent.
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<ContentId, Bytes>>,
}

impl InMemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Remove a blob. Returns `true` if it existed.
    pub fn remove(&self, cid: &ContentId) -> bool {
        self.blobs.write().expect("lock poisoned").remove(cid).is_some()
    }

    /// Store bytes under a caller-chosen id, bypassing content addressing.
    ///
    /// Lets tests reproduce documents that were pinned elsewhere.
    pub fn insert_raw(&self, cid: ContentId, data: impl Into<Bytes>) {
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(cid, data.into());
    }

    fn read(&self, cid: &ContentId) -> ContentResult<Bytes> {
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(cid)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(cid.clone()))
    }

    fn write(&self, data: Bytes) -> ContentId {
        let cid = content_id_for(&data);
        self.blobs
            .write()
            .expect("lock poisoned")
            .entry(cid.clone())
            .or_insert(data);
        cid
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get_bytes(&self, cid: &ContentId) -> ContentResult<Bytes> {
        self.read(cid)
    }

    async fn get_json(&self, cid: &ContentId) -> ContentResult<Value> {
        let data = self.read(cid)?;
        serde_json::from_slice(&data).map_err(|e| ContentError::InvalidDocument {
            cid: cid.clone(),
            reason: e.to_string(),
        })
    }

    async fn put_bytes(&self, data: Bytes) -> ContentResult<ContentId> {
        let cid = self.write(data);
        tracing::debug!(%cid, "stored blob");
        Ok(cid)
    }

    async fn put_json(&self, value: &Value) -> ContentResult<ContentId> {
        let data =
            serde_json::to_vec(value).map_err(|e| ContentError::Serialization(e.to_string()))?;
        let cid = self.write(Bytes::from(data));
        tracing::debug!(%cid, "stored json document");
        Ok(cid)
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
