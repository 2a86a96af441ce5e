//! Query parameters and the denormalized rows returned by the indexer.
//!
//! Field names follow the subgraph schema (`bookURI`, `reviewId`, ...), so the
//! rows deserialize directly from GraphQL responses.

use folio_types::{Address, BookId, LikeAmount, ReviewId};
use serde::{Deserialize, Serialize};

/// Default number of rows fetched per list query.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Field a list query is ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderField {
    BlockNumber,
    BlockTimestamp,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::BlockNumber => "blockNumber",
            OrderField::BlockTimestamp => "blockTimestamp",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Ordering and limit for a list query. No pagination cursor is modeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub order_by: OrderField,
    pub direction: OrderDirection,
    pub first: u32,
}

impl QueryParams {
    /// Newest reviews first.
    pub fn latest_reviews() -> Self {
        Self {
            order_by: OrderField::BlockNumber,
            direction: OrderDirection::Desc,
            first: DEFAULT_PAGE_SIZE,
        }
    }

    /// Newest books first.
    pub fn latest_books() -> Self {
        Self {
            order_by: OrderField::BlockTimestamp,
            direction: OrderDirection::Desc,
            first: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_first(mut self, first: u32) -> Self {
        self.first = first;
        self
    }

    pub fn with_order(mut self, order_by: OrderField, direction: OrderDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }
}

/// One like-grant event: `amount` likes distributed to a review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeGrant {
    pub amount: LikeAmount,
}

/// Sum of discrete like-grant amounts.
pub fn total_likes(likes: &[LikeGrant]) -> LikeAmount {
    likes.iter().map(|l| l.amount).sum()
}

/// The parent book as embedded in a review row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub owner: Address,
    pub book_id: BookId,
    #[serde(rename = "bookURI")]
    pub book_uri: String,
}

/// A review joined with its book and the likes it has received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRow {
    pub id: String,
    pub owner: Address,
    pub review_id: ReviewId,
    #[serde(rename = "reviewURI")]
    pub review_uri: String,
    pub book: BookRef,
    #[serde(default)]
    pub likes: Vec<LikeGrant>,
}

impl ReviewRow {
    pub fn book_id(&self) -> BookId {
        self.book.book_id
    }

    pub fn total_likes(&self) -> LikeAmount {
        total_likes(&self.likes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRow {
    pub id: String,
    pub book_id: BookId,
    #[serde(rename = "bookURI")]
    pub book_uri: String,
}

/// A single book with every like granted through its reviews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetailRow {
    #[serde(rename = "bookURI")]
    pub book_uri: String,
    #[serde(default)]
    pub likes: Vec<LikeGrant>,
}

impl BookDetailRow {
    pub fn total_likes(&self) -> LikeAmount {
        total_likes(&self.likes)
    }
}
