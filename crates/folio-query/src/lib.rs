//! Read access to the indexed view of Folio's on-chain events.
//!
//! Minted books, minted reviews and like distributions are indexed by a
//! subgraph. This crate exposes that index through the [`QueryClient`] trait:
//!
//! - [`GraphQlQueryClient`] -- posts GraphQL queries to a subgraph endpoint
//! - [`InMemoryQueryClient`] -- an in-process index for tests and demos
//!
//! Rows are denormalized: a [`ReviewRow`] embeds its parent book and the
//! like grants it has received.

pub mod error;
pub mod graphql;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{QueryError, QueryResult};
pub use graphql::GraphQlQueryClient;
pub use memory::{BlockRef, InMemoryQueryClient};
pub use traits::QueryClient;
pub use types::{
    total_likes, BookDetailRow, BookRef, BookRow, LikeGrant, OrderDirection, OrderField,
    QueryParams, ReviewRow, DEFAULT_PAGE_SIZE,
};
