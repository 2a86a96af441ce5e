//! In-memory indexer for tests, demos and offline use.
//!
//! [`InMemoryQueryClient`] is fed the same events the subgraph would index
//! (book minted, review minted, likes granted) and answers queries over them
//! with the subgraph's ordering and limit semantics.

use std::sync::RwLock;

use async_trait::async_trait;
use folio_types::{Address, BookId, LikeAmount, ReviewId};

use crate::error::{QueryError, QueryResult};
use crate::traits::QueryClient;
use crate::types::{
    BookDetailRow, BookRef, BookRow, LikeGrant, OrderDirection, OrderField, QueryParams,
    ReviewRow,
};

/// Block position of an indexed event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockRef {
    pub number: u64,
    pub timestamp: u64,
}

impl BlockRef {
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }

    fn key(&self, field: OrderField) -> u64 {
        match field {
            OrderField::BlockNumber => self.number,
            OrderField::BlockTimestamp => self.timestamp,
        }
    }
}

#[derive(Clone, Debug)]
struct BookEntity {
    book_id: BookId,
    owner: Address,
    uri: String,
    block: BlockRef,
}

#[derive(Clone, Debug)]
struct ReviewEntity {
    review_id: ReviewId,
    book_id: BookId,
    owner: Address,
    uri: String,
    block: BlockRef,
}

#[derive(Clone, Debug)]
struct LikeEntity {
    book_id: BookId,
    review_id: ReviewId,
    amount: LikeAmount,
}

#[derive(Default)]
struct IndexState {
    books: Vec<BookEntity>,
    reviews: Vec<ReviewEntity>,
    likes: Vec<LikeEntity>,
    unavailable: bool,
}

/// An in-memory implementation of [`QueryClient`].
#[derive(Default)]
pub struct InMemoryQueryClient {
    inner: RwLock<IndexState>,
}

impl InMemoryQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_book(&self, book_id: BookId, owner: Address, uri: impl Into<String>, block: BlockRef) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.books.push(BookEntity {
            book_id,
            owner,
            uri: uri.into(),
            block,
        });
    }

    pub fn index_review(
        &self,
        review_id: ReviewId,
        book_id: BookId,
        owner: Address,
        uri: impl Into<String>,
        block: BlockRef,
    ) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.reviews.push(ReviewEntity {
            review_id,
            book_id,
            owner,
            uri: uri.into(),
            block,
        });
    }

    pub fn index_like(&self, book_id: BookId, review_id: ReviewId, amount: LikeAmount) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.likes.push(LikeEntity {
            book_id,
            review_id,
            amount,
        });
    }

    /// Simulate an indexer outage: every query fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().expect("lock poisoned").unavailable = unavailable;
    }

    fn state(&self) -> QueryResult<std::sync::RwLockReadGuard<'_, IndexState>> {
        let state = self.inner.read().expect("lock poisoned");
        if state.unavailable {
            return Err(QueryError::Unavailable);
        }
        Ok(state)
    }
}

/// Order `items` by block key, then apply the limit.
fn order_and_limit<T>(mut items: Vec<(BlockRef, T)>, params: &QueryParams) -> Vec<T> {
    // Stable sort: ties stay in index order, newest last until reversed.
    items.sort_by(|(a, _), (b, _)| a.key(params.order_by).cmp(&b.key(params.order_by)));
    if params.direction == OrderDirection::Desc {
        items.reverse();
    }
    items
        .into_iter()
        .take(params.first as usize)
        .map(|(_, item)| item)
        .collect()
}

#[async_trait]
impl QueryClient for InMemoryQueryClient {
    async fn reviews(&self, params: &QueryParams) -> QueryResult<Vec<ReviewRow>> {
        let state = self.state()?;
        let mut rows = Vec::with_capacity(state.reviews.len());
        for review in &state.reviews {
            let Some(book) = state.books.iter().find(|b| b.book_id == review.book_id) else {
                tracing::warn!(review_id = %review.review_id, "review references unindexed book");
                continue;
            };
            let likes = state
                .likes
                .iter()
                .filter(|l| l.book_id == review.book_id && l.review_id == review.review_id)
                .map(|l| LikeGrant { amount: l.amount })
                .collect();
            rows.push((
                review.block,
                ReviewRow {
                    id: format!("review-{}", review.review_id),
                    owner: review.owner,
                    review_id: review.review_id,
                    review_uri: review.uri.clone(),
                    book: BookRef {
                        owner: book.owner,
                        book_id: book.book_id,
                        book_uri: book.uri.clone(),
                    },
                    likes,
                },
            ));
        }
        Ok(order_and_limit(rows, params))
    }

    async fn books(&self, params: &QueryParams) -> QueryResult<Vec<BookRow>> {
        let state = self.state()?;
        let rows = state
            .books
            .iter()
            .map(|b| {
                (
                    b.block,
                    BookRow {
                        id: format!("book-{}", b.book_id),
                        book_id: b.book_id,
                        book_uri: b.uri.clone(),
                    },
                )
            })
            .collect();
        Ok(order_and_limit(rows, params))
    }

    async fn book(&self, id: &BookId) -> QueryResult<Option<BookDetailRow>> {
        let state = self.state()?;
        let Some(book) = state.books.iter().find(|b| &b.book_id == id) else {
            return Ok(None);
        };
        let likes = state
            .likes
            .iter()
            .filter(|l| &l.book_id == id)
            .map(|l| LikeGrant { amount: l.amount })
            .collect();
        Ok(Some(BookDetailRow {
            book_uri: book.uri.clone(),
            likes,
        }))
    }
}

impl std::fmt::Debug for InMemoryQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryQueryClient")
            .field("books", &state.books.len())
            .field("reviews", &state.reviews.len())
            .field("likes", &state.likes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    fn seeded() -> InMemoryQueryClient {
        let index = InMemoryQueryClient::new();
        index.index_book(BookId::from(1), addr(1), "ipfs://book1", BlockRef::new(10, 1000));
        index.index_book(BookId::from(2), addr(2), "ipfs://book2", BlockRef::new(11, 900));
        index.index_review(ReviewId::from(1), BookId::from(1), addr(3), "ipfs://r1", BlockRef::new(12, 1200));
        index.index_review(ReviewId::from(2), BookId::from(2), addr(4), "ipfs://r2", BlockRef::new(13, 1300));
        index.index_review(ReviewId::from(3), BookId::from(1), addr(5), "ipfs://r3", BlockRef::new(14, 1400));
        index.index_like(BookId::from(1), ReviewId::from(1), LikeAmount::from(2));
        index.index_like(BookId::from(1), ReviewId::from(1), LikeAmount::from(5));
        index.index_like(BookId::from(1), ReviewId::from(3), LikeAmount::from(1));
        index
    }

    #[tokio::test]
    async fn reviews_newest_first_with_likes() {
        let index = seeded();
        let rows = index.reviews(&QueryParams::latest_reviews()).await.unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.review_id.as_u256().as_u64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(rows[2].total_likes(), LikeAmount::from(7));
        assert_eq!(rows[0].book.book_uri, "ipfs://book1");
        assert!(rows[1].likes.is_empty());
    }

    #[tokio::test]
    async fn limit_and_ascending_order() {
        let index = seeded();
        let params = QueryParams::latest_reviews()
            .with_order(OrderField::BlockNumber, OrderDirection::Asc)
            .with_first(2);
        let rows = index.reviews(&params).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].review_id, ReviewId::from(1));
        assert_eq!(rows[1].review_id, ReviewId::from(2));
    }

    #[tokio::test]
    async fn books_by_timestamp() {
        let index = seeded();
        let rows = index.books(&QueryParams::latest_books()).await.unwrap();
        // Book 1 was indexed at a later timestamp than book 2.
        assert_eq!(rows[0].book_id, BookId::from(1));
        assert_eq!(rows[1].book_id, BookId::from(2));
    }

    #[tokio::test]
    async fn book_detail_aggregates_likes_across_reviews() {
        let index = seeded();
        let detail = index.book(&BookId::from(1)).await.unwrap().unwrap();
        assert_eq!(detail.total_likes(), LikeAmount::from(8));
        assert!(index.book(&BookId::from(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reviews_of_unknown_books_are_skipped() {
        let index = InMemoryQueryClient::new();
        index.index_review(ReviewId::from(1), BookId::from(5), addr(1), "ipfs://r", BlockRef::default());
        assert!(index.reviews(&QueryParams::latest_reviews()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn outage_fails_every_query() {
        let index = seeded();
        index.set_unavailable(true);
        assert!(matches!(
            index.reviews(&QueryParams::latest_reviews()).await,
            Err(QueryError::Unavailable)
        ));
        assert!(index.book(&BookId::from(1)).await.is_err());
        index.set_unavailable(false);
        assert!(index.books(&QueryParams::latest_books()).await.is_ok());
    }

    #[test]
    fn debug_counts() {
        let debug = format!("{:?}", seeded());
        assert!(debug.contains("reviews: 3"));
    }
}
