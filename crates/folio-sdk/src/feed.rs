//! Query rows joined with their off-chain metadata.
//!
//! Metadata is fetched per item. One unreachable or malformed document marks
//! that item [`Resolved::Failed`]; its siblings still resolve. A URI that is
//! not `ipfs://` is never fetched and resolves to [`Resolved::Absent`].

use folio_content::{ContentStore, ContentStoreExt};
use folio_query::{BookRow, ReviewRow};
use folio_types::{BookId, BookMetadata, ContentId, LikeAmount, ReviewMetadata};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Outcome of resolving one metadata document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolved<T> {
    Ready(T),
    Failed(String),
    Absent,
}

impl<T> Resolved<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Resolved::Ready(value) => Some(value),
            Resolved::Failed(_) | Resolved::Absent => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Resolved::Ready(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resolved::Failed(message) => Some(message),
            Resolved::Ready(_) | Resolved::Absent => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedReview {
    pub row: ReviewRow,
    pub review: Resolved<ReviewMetadata>,
    pub book: Resolved<BookMetadata>,
}

impl ResolvedReview {
    pub fn total_likes(&self) -> LikeAmount {
        self.row.total_likes()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedBook {
    pub row: BookRow,
    pub metadata: Resolved<BookMetadata>,
}

/// A single book with every like granted through its reviews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookDetail {
    pub book_id: BookId,
    pub book_uri: String,
    pub metadata: Resolved<BookMetadata>,
    pub total_likes: LikeAmount,
}

/// Fetch and decode the document behind `uri`.
pub(crate) async fn resolve_document<T>(store: &dyn ContentStore, uri: &str) -> Resolved<T>
where
    T: DeserializeOwned + Send,
{
    let Some(cid) = ContentId::from_ipfs_uri(uri) else {
        tracing::debug!(%uri, "metadata uri is not ipfs, skipping");
        return Resolved::Absent;
    };
    match store.get_document::<T>(&cid).await {
        Ok(doc) => Resolved::Ready(doc),
        Err(e) => {
            tracing::warn!(%cid, error = %e, "metadata resolution failed");
            Resolved::Failed(e.to_string())
        }
    }
}

pub(crate) async fn resolve_review(store: &dyn ContentStore, row: ReviewRow) -> ResolvedReview {
    let (review, book) = futures::join!(
        resolve_document::<ReviewMetadata>(store, &row.review_uri),
        resolve_document::<BookMetadata>(store, &row.book.book_uri),
    );
    ResolvedReview { row, review, book }
}

pub(crate) async fn resolve_book(store: &dyn ContentStore, row: BookRow) -> ResolvedBook {
    let metadata = resolve_document(store, &row.book_uri).await;
    ResolvedBook { row, metadata }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::InMemoryContentStore;
    use serde_json::json;

    #[tokio::test]
    async fn resolves_ready_and_failed() {
        let store = InMemoryContentStore::new();
        let cid = store
            .put_json(&json!({"name": "Dune", "description": "Spice"}))
            .await
            .unwrap();

        let ready: Resolved<BookMetadata> = resolve_document(&store, &cid.to_uri()).await;
        assert_eq!(ready.ready().unwrap().name, "Dune");

        let missing: Resolved<BookMetadata> = resolve_document(&store, "ipfs://bafkmissing").await;
        assert!(missing.error().is_some());

        let blank: Resolved<BookMetadata> = resolve_document(&store, "ipfs://").await;
        assert_eq!(blank, Resolved::Absent);
    }

    #[tokio::test]
    async fn non_ipfs_uris_are_not_fetched() {
        let store = InMemoryContentStore::new();
        let cid = store
            .put_json(&json!({"name": "Dune", "description": "Spice"}))
            .await
            .unwrap();

        let https: Resolved<BookMetadata> =
            resolve_document(&store, &format!("https://example.com/{cid}")).await;
        assert_eq!(https, Resolved::Absent);
        assert!(https.error().is_none());

        // A bare id is not an on-chain URI either.
        let bare: Resolved<BookMetadata> = resolve_document(&store, cid.as_str()).await;
        assert_eq!(bare, Resolved::Absent);
    }

    #[tokio::test]
    async fn wrong_shape_is_failed_not_fatal() {
        let store = InMemoryContentStore::new();
        let cid = store.put_json(&json!({"title": "no name field"})).await.unwrap();
        let doc: Resolved<ReviewMetadata> = resolve_document(&store, &cid.to_uri()).await;
        assert!(doc.error().is_some());
    }

    #[test]
    fn resolved_serializes_with_status() {
        let value = serde_json::to_value(Resolved::<u8>::Failed("gone".into())).unwrap();
        assert_eq!(value, json!({"status": "failed", "value": "gone"}));
        let value = serde_json::to_value(Resolved::<u8>::Absent).unwrap();
        assert_eq!(value, json!({"status": "absent"}));
    }
}
