//! In-process chain for tests, demos and offline use.
//!
//! [`LocalChain`] pairs an [`InMemoryLedger`] with an [`InMemoryQueryClient`]
//! and replays every ledger event into the index after each submission, the
//! way a subgraph follows the real contracts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_content::InMemoryContentStore;
use folio_ledger::{
    InMemoryLedger, LedgerCall, LedgerClient, LedgerEvent, LedgerResult, TxReceipt,
};
use folio_query::{BlockRef, InMemoryQueryClient};
use folio_types::{Address, LikeAmount};

use crate::client::Folio;
use crate::config::FolioConfig;

const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
const BLOCK_TIME_SECS: u64 = 2;

#[derive(Default)]
struct Cursor {
    seen: usize,
    block: u64,
}

/// Simulated ledger plus the index that follows it.
#[derive(Default)]
pub struct LocalChain {
    ledger: InMemoryLedger,
    index: Arc<InMemoryQueryClient>,
    cursor: Mutex<Cursor>,
}

impl LocalChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    pub fn index(&self) -> Arc<InMemoryQueryClient> {
        self.index.clone()
    }

    /// Index every event the ledger emitted since the last sync, one block
    /// per event.
    fn sync(&self) {
        let mut cursor = self.cursor.lock().expect("lock poisoned");
        let events = self.ledger.events_since(cursor.seen);
        cursor.seen += events.len();

        for event in events {
            cursor.block += 1;
            let timestamp = GENESIS_TIMESTAMP + cursor.block * BLOCK_TIME_SECS;
            let block = BlockRef::new(cursor.block, timestamp);
            match event {
                LedgerEvent::BookMinted {
                    book_id,
                    owner,
                    uri,
                } => self.index.index_book(book_id, owner, uri, block),
                LedgerEvent::ReviewMinted {
                    review_id,
                    book_id,
                    owner,
                    uri,
                } => self.index.index_review(review_id, book_id, owner, uri, block),
                LedgerEvent::LikesDistributed {
                    book_id,
                    review_id,
                    amount,
                    ..
                } => self.index.index_like(book_id, review_id, amount),
                LedgerEvent::LikesMinted { .. } => {}
            }
        }
    }
}

#[async_trait]
impl LedgerClient for LocalChain {
    async fn submit(&self, from: Address, call: &LedgerCall) -> LedgerResult<TxReceipt> {
        let result = self.ledger.submit(from, call).await;
        self.sync();
        result
    }

    async fn receipt(&self, tx_hash: &str, call: &LedgerCall) -> LedgerResult<Option<TxReceipt>> {
        self.ledger.receipt(tx_hash, call).await
    }

    async fn balance_of(&self, owner: Address) -> LedgerResult<LikeAmount> {
        self.ledger.balance_of(owner).await
    }
}

impl Folio {
    /// A client wired entirely in memory: content store, ledger and index.
    pub fn local(config: FolioConfig) -> (Self, Arc<LocalChain>) {
        let chain = Arc::new(LocalChain::new());
        let folio = Folio::new(
            config,
            Arc::new(InMemoryContentStore::new()),
            chain.index(),
            chain.clone(),
        );
        (folio, chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_query::{QueryClient, QueryParams};
    use folio_types::{BookId, ReviewId};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    #[tokio::test]
    async fn index_follows_ledger() {
        let chain = LocalChain::new();
        chain
            .submit(
                addr(1),
                &LedgerCall::MintBook {
                    owner: addr(1),
                    metadata_uri: "ipfs://book".into(),
                },
            )
            .await
            .unwrap();
        chain
            .submit(
                addr(2),
                &LedgerCall::MintReview {
                    book_id: BookId::from(1),
                    metadata_uri: "ipfs://review".into(),
                },
            )
            .await
            .unwrap();
        chain
            .submit(
                addr(3),
                &LedgerCall::MintLikes {
                    owner: addr(3),
                    amount: LikeAmount::from(4),
                },
            )
            .await
            .unwrap();
        chain
            .submit(
                addr(3),
                &LedgerCall::BatchDistribute {
                    book_ids: vec![BookId::from(1)],
                    review_ids: vec![ReviewId::from(1)],
                    amounts: vec![LikeAmount::from(4)],
                },
            )
            .await
            .unwrap();

        let index = chain.index();
        let reviews = index.reviews(&QueryParams::latest_reviews()).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].owner, addr(2));
        assert_eq!(reviews[0].total_likes(), LikeAmount::from(4));
        assert_eq!(index.books(&QueryParams::latest_books()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_submissions_index_nothing() {
        let chain = LocalChain::new();
        chain.ledger().reject_next();
        let result = chain
            .submit(
                addr(1),
                &LedgerCall::MintBook {
                    owner: addr(1),
                    metadata_uri: "ipfs://book".into(),
                },
            )
            .await;
        assert!(result.is_err());
        assert!(chain
            .index()
            .books(&QueryParams::latest_books())
            .await
            .unwrap()
            .is_empty());
    }
}
