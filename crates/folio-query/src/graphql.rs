//! GraphQL client for the hosted subgraph.

use std::time::Duration;

use async_trait::async_trait;
use folio_types::BookId;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{QueryError, QueryResult};
use crate::traits::QueryClient;
use crate::types::{BookDetailRow, BookRow, QueryParams, ReviewRow};

pub const REVIEWS_QUERY: &str = "query Reviews($first: Int!, $orderBy: Review_orderBy, $orderDirection: OrderDirection) {
  reviews(orderBy: $orderBy, orderDirection: $orderDirection, first: $first) {
    id
    owner
    reviewId
    reviewURI
    book { owner bookId bookURI }
    likes { amount }
  }
}";

pub const BOOKS_QUERY: &str = "query Books($first: Int!, $orderBy: Book_orderBy, $orderDirection: OrderDirection) {
  books(orderBy: $orderBy, orderDirection: $orderDirection, first: $first) {
    id
    bookId
    bookURI
  }
}";

pub const BOOK_QUERY: &str = "query Book($id: ID!) {
  book(id: $id) {
    bookURI
    likes { amount }
  }
}";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ReviewsData {
    reviews: Vec<ReviewRow>,
}

#[derive(Deserialize)]
struct BooksData {
    books: Vec<BookRow>,
}

#[derive(Deserialize)]
struct BookData {
    book: Option<BookDetailRow>,
}

/// Query client that posts GraphQL documents to a subgraph endpoint.
pub struct GraphQlQueryClient {
    http: reqwest::Client,
    url: String,
}

impl GraphQlQueryClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> QueryResult<T> {
        let request = GraphQlRequest { query, variables };
        tracing::debug!(url = %self.url, "posting subgraph query");
        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: GraphQlResponse<T> = response.json().await?;
        decode_response(body)
    }
}

fn decode_response<T>(body: GraphQlResponse<T>) -> QueryResult<T> {
    if !body.errors.is_empty() {
        return Err(QueryError::GraphQl(
            body.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    body.data
        .ok_or_else(|| QueryError::Decode("response carried neither data nor errors".into()))
}

fn list_variables(params: &QueryParams) -> Value {
    json!({
        "first": params.first,
        "orderBy": params.order_by.as_str(),
        "orderDirection": params.direction.as_str(),
    })
}

#[async_trait]
impl QueryClient for GraphQlQueryClient {
    async fn reviews(&self, params: &QueryParams) -> QueryResult<Vec<ReviewRow>> {
        let data: ReviewsData = self.execute(REVIEWS_QUERY, list_variables(params)).await?;
        Ok(data.reviews)
    }

    async fn books(&self, params: &QueryParams) -> QueryResult<Vec<BookRow>> {
        let data: BooksData = self.execute(BOOKS_QUERY, list_variables(params)).await?;
        Ok(data.books)
    }

    async fn book(&self, id: &BookId) -> QueryResult<Option<BookDetailRow>> {
        let data: BookData = self
            .execute(BOOK_QUERY, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.book)
    }
}

impl std::fmt::Debug for GraphQlQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlQueryClient")
            .field("url", &self.url)
            .finish()
    }
}
