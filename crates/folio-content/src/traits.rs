use async_trait::async_trait;
use bytes::Bytes;
use folio_types::ContentId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ContentError, ContentResult};

/// Key-value content store addressed by [`ContentId`].
///
/// All implementations must satisfy these invariants:
/// - A put returns the id under which the exact bytes can be read back.
/// - Reads never mutate the store.
/// - A missing id is reported as [`ContentError::NotFound`], distinct from
///   transport or gateway failures.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read raw bytes (cover images, arbitrary blobs).
    async fn get_bytes(&self, cid: &ContentId) -> ContentResult<Bytes>;

    /// Read and parse a JSON document.
    async fn get_json(&self, cid: &ContentId) -> ContentResult<Value>;

    /// Store raw bytes and return their id.
    async fn put_bytes(&self, data: Bytes) -> ContentResult<ContentId>;

    /// Store a JSON document and return its id.
    async fn put_json(&self, value: &Value) -> ContentResult<ContentId>;
}

/// Typed helpers over any [`ContentStore`].
#[async_trait]
pub trait ContentStoreExt: ContentStore {
    /// Read a JSON document and decode it into `T`.
    async fn get_document<T>(&self, cid: &ContentId) -> ContentResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.get_json(cid).await?;
        serde_json::from_value(value).map_err(|e| ContentError::InvalidDocument {
            cid: cid.clone(),
            reason: e.to_string(),
        })
    }

    /// Encode `doc` as JSON and store it.
    async fn put_document<T>(&self, doc: &T) -> ContentResult<ContentId>
    where
        T: Serialize + Sync,
    {
        let value =
            serde_json::to_value(doc).map_err(|e| ContentError::Serialization(e.to_string()))?;
        self.put_json(&value).await
    }
}

impl<S: ContentStore + ?Sized> ContentStoreExt for S {}
