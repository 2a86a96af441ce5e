use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::join_all;

use folio_content::{ContentStore, ContentStoreExt, GatewayContentStore};
use folio_ledger::{JsonRpcLedger, LedgerCall, LedgerClient};
use folio_likes::{DistributionSummary, LikeSession};
use folio_query::{GraphQlQueryClient, QueryClient, QueryParams, ReviewRow};
use folio_types::{Address, BookId, ContentId, LikeAmount, ReviewMetadata};

use crate::config::FolioConfig;
use crate::draft::{BookDraft, Published};
use crate::error::{SdkError, SdkResult};
use crate::feed::{
    resolve_book, resolve_document, resolve_review, BookDetail, ResolvedBook, ResolvedReview,
};

/// High-level Folio client.
///
/// Composes a content store, a query client and a ledger client. Reads go
/// through the query client and resolve metadata through the content store;
/// writes upload metadata first and then submit a ledger call.
pub struct Folio {
    config: FolioConfig,
    content: Arc<dyn ContentStore>,
    query: Arc<dyn QueryClient>,
    ledger: Arc<dyn LedgerClient>,
}

impl Folio {
    pub fn new(
        config: FolioConfig,
        content: Arc<dyn ContentStore>,
        query: Arc<dyn QueryClient>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            config,
            content,
            query,
            ledger,
        }
    }

    /// Build network clients from `config`.
    pub fn connect(config: FolioConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut content = GatewayContentStore::new(&config.gateway_url, &config.upload_url);
        if let Some(jwt) = &config.upload_jwt {
            content = content.with_jwt(jwt);
        }
        let query = GraphQlQueryClient::new(&config.subgraph_url);
        let ledger = JsonRpcLedger::new(&config.rpc_url, config.contracts)
            .with_chain_id(config.chain_id)
            .with_polling(
                Duration::from_millis(config.poll_interval_ms),
                Duration::from_secs(config.tx_timeout_secs),
            );

        tracing::debug!(
            subgraph = %config.subgraph_url,
            rpc = %config.rpc_url,
            chain_id = config.chain_id,
            "folio client configured"
        );
        Ok(Self::new(
            config,
            Arc::new(content),
            Arc::new(query),
            Arc::new(ledger),
        ))
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn content(&self) -> &Arc<dyn ContentStore> {
        &self.content
    }

    pub fn query(&self) -> &Arc<dyn QueryClient> {
        &self.query
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    // ---- Reads ----

    async fn review_rows(&self) -> SdkResult<Vec<ReviewRow>> {
        let params = QueryParams::latest_reviews().with_first(self.config.feed_size);
        Ok(self.query.reviews(&params).await?)
    }

    /// Newest reviews with review and book metadata resolved concurrently.
    pub async fn review_feed(&self) -> SdkResult<Vec<ResolvedReview>> {
        let rows = self.review_rows().await?;
        let store = self.content.as_ref();
        Ok(join_all(rows.into_iter().map(|row| resolve_review(store, row))).await)
    }

    /// Newest books with their metadata.
    pub async fn book_shelf(&self) -> SdkResult<Vec<ResolvedBook>> {
        let params = QueryParams::latest_books().with_first(self.config.feed_size);
        let rows = self.query.books(&params).await?;
        let store = self.content.as_ref();
        Ok(join_all(rows.into_iter().map(|row| resolve_book(store, row))).await)
    }

    /// A book's metadata and like total; `None` if the indexer has not seen it.
    pub async fn book_detail(&self, book_id: BookId) -> SdkResult<Option<BookDetail>> {
        let Some(row) = self.query.book(&book_id).await? else {
            return Ok(None);
        };
        let metadata = resolve_document(self.content.as_ref(), &row.book_uri).await;
        Ok(Some(BookDetail {
            book_id,
            total_likes: row.total_likes(),
            book_uri: row.book_uri,
            metadata,
        }))
    }

    /// Cover image bytes behind an `ipfs://` URI or bare content id.
    pub async fn resolve_image(&self, uri: &str) -> SdkResult<Bytes> {
        let cid = ContentId::from_uri(uri)?;
        Ok(self.content.get_bytes(&cid).await?)
    }

    pub async fn like_balance(&self, owner: Address) -> SdkResult<LikeAmount> {
        Ok(self.ledger.balance_of(owner).await?)
    }

    // ---- Writes ----

    /// Upload the cover image and metadata, then mint the book.
    ///
    /// The book goes to `config.book_owner` when set, else to `from`.
    pub async fn publish_book(&self, from: Address, draft: BookDraft) -> SdkResult<Published> {
        let mut metadata = draft.metadata();
        metadata.validate()?;

        if let Some(image) = draft.image {
            let image_cid = self.content.put_bytes(image).await?;
            tracing::debug!(%image_cid, "cover image uploaded");
            metadata = metadata.with_image(&image_cid);
        }

        let cid = self.content.put_document(&metadata).await?;
        let metadata_uri = cid.to_uri();
        let owner = self.config.book_owner.unwrap_or(from);
        let call = LedgerCall::MintBook {
            owner,
            metadata_uri: metadata_uri.clone(),
        };
        let receipt = self.ledger.submit(from, &call).await?;
        tracing::info!(%metadata_uri, %owner, tx_hash = %receipt.tx_hash, "book published");
        Ok(Published {
            metadata_uri,
            receipt,
        })
    }

    /// Upload a review document and mint it against `book_id`.
    pub async fn publish_review(
        &self,
        from: Address,
        book_id: BookId,
        review: ReviewMetadata,
    ) -> SdkResult<Published> {
        let review = ReviewMetadata::new(&review.name, &review.description);
        review.validate()?;

        let cid = self.content.put_document(&review).await?;
        let metadata_uri = cid.to_uri();
        let call = LedgerCall::MintReview {
            book_id,
            metadata_uri: metadata_uri.clone(),
        };
        let receipt = self.ledger.submit(from, &call).await?;
        tracing::info!(%metadata_uri, %book_id, tx_hash = %receipt.tx_hash, "review published");
        Ok(Published {
            metadata_uri,
            receipt,
        })
    }

    /// Mint likes to `from` and return the balance read back afterwards.
    pub async fn mint_likes(&self, from: Address, amount: LikeAmount) -> SdkResult<LikeAmount> {
        let max = LikeAmount::from(self.config.max_mint);
        if amount.is_zero() || amount > max {
            return Err(SdkError::InvalidInput(format!(
                "mint amount must be between 1 and {max}, got {amount}"
            )));
        }

        let call = LedgerCall::MintLikes {
            owner: from,
            amount,
        };
        let receipt = self.ledger.submit(from, &call).await?;
        tracing::info!(%amount, tx_hash = %receipt.tx_hash, "likes minted");

        // Balance is read back from the ledger, never computed locally.
        let balance = self.ledger.balance_of(from).await?;
        Ok(balance)
    }

    // ---- Likes ----

    /// A like session staged against the current review feed.
    pub async fn like_session(&self) -> SdkResult<LikeSession> {
        let rows = self.review_rows().await?;
        Ok(LikeSession::new(self.ledger.clone(), rows))
    }

    /// Submit a session's staged likes, then refresh its feed so like totals
    /// reflect the distribution.
    pub async fn submit_likes(
        &self,
        session: &mut LikeSession,
        from: Address,
    ) -> SdkResult<DistributionSummary> {
        let summary = session.submit(from).await?;
        self.refresh_feed(session).await;
        Ok(summary)
    }

    /// Settle a batch left unconfirmed by a receipt timeout. Refreshes the
    /// feed once it turns out to have landed.
    pub async fn settle_likes(
        &self,
        session: &mut LikeSession,
    ) -> SdkResult<Option<DistributionSummary>> {
        let summary = session.settle().await?;
        if summary.is_some() {
            self.refresh_feed(session).await;
        }
        Ok(summary)
    }

    async fn refresh_feed(&self, session: &mut LikeSession) {
        match self.review_rows().await {
            Ok(rows) => session.replace_feed(rows),
            // A stale feed is tolerated once the distribution has landed.
            Err(e) => tracing::warn!(error = %e, "feed refresh after distribution failed"),
        }
    }
}

impl std::fmt::Debug for Folio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folio")
            .field("subgraph_url", &self.config.subgraph_url)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}
