use async_trait::async_trait;
use folio_types::BookId;

use crate::error::QueryResult;
use crate::types::{BookDetailRow, BookRow, QueryParams, ReviewRow};

/// Read-only interface to the indexed view of on-chain events.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Reviews joined with their book and like grants.
    async fn reviews(&self, params: &QueryParams) -> QueryResult<Vec<ReviewRow>>;

    async fn books(&self, params: &QueryParams) -> QueryResult<Vec<BookRow>>;

    /// A single book, or `None` if the indexer has never seen it.
    async fn book(&self, id: &BookId) -> QueryResult<Option<BookDetailRow>>;
}
