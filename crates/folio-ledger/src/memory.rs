use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use folio_types::{Address, BookId, LikeAmount, ReviewId};

use crate::call::{LedgerCall, Minted, TxReceipt};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::LedgerClient;

/// Something the simulated contracts emitted. Consumers replay these to keep
/// an index in step with the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    BookMinted {
        book_id: BookId,
        owner: Address,
        uri: String,
    },
    ReviewMinted {
        review_id: ReviewId,
        book_id: BookId,
        owner: Address,
        uri: String,
    },
    LikesMinted {
        owner: Address,
        amount: LikeAmount,
    },
    LikesDistributed {
        book_id: BookId,
        review_id: ReviewId,
        amount: LikeAmount,
        review_owner: Address,
        book_owner: Address,
    },
}

#[derive(Clone, Debug)]
struct BookRecord {
    owner: Address,
}

#[derive(Clone, Debug)]
struct ReviewRecord {
    book_id: BookId,
    owner: Address,
}

#[derive(Default)]
struct LedgerState {
    books: BTreeMap<BookId, BookRecord>,
    reviews: BTreeMap<ReviewId, ReviewRecord>,
    balances: HashMap<Address, LikeAmount>,
    events: Vec<LedgerEvent>,
    receipts: HashMap<String, TxReceipt>,
    tx_count: u64,
    reject_next: bool,
}

impl LedgerState {
    fn balance(&self, owner: &Address) -> LikeAmount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn credit(&mut self, owner: Address, amount: LikeAmount) {
        let balance = self.balances.entry(owner).or_default();
        *balance = balance.saturating_add(amount);
    }

    fn next_tx_hash(&mut self, from: &Address, call: &LedgerCall) -> String {
        self.tx_count += 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.tx_count.to_be_bytes());
        hasher.update(from.as_bytes());
        hasher.update(call.signature().as_bytes());
        format!("0x{}", hasher.finalize().to_hex())
    }
}

/// Simulation of the Book, Review and Like contracts for tests and demos.
///
/// Book and review ids are assigned sequentially from 1. A batch
/// distribution is validated in full before any balance moves: each amount
/// is split evenly between the review owner and the book owner, rounding
/// down, and the sender is debited the whole amount.
#[derive(Default)]
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next submission fail as if the signer declined it.
    pub fn reject_next(&self) {
        self.inner.write().expect("lock poisoned").reject_next = true;
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.inner.read().expect("lock poisoned").events.clone()
    }

    /// Events emitted after the first `seen`.
    pub fn events_since(&self, seen: usize) -> Vec<LedgerEvent> {
        let state = self.inner.read().expect("lock poisoned");
        state.events.iter().skip(seen).cloned().collect()
    }

    pub fn book_owner(&self, book_id: &BookId) -> Option<Address> {
        let state = self.inner.read().expect("lock poisoned");
        state.books.get(book_id).map(|b| b.owner)
    }

    pub fn review_owner(&self, review_id: &ReviewId) -> Option<Address> {
        let state = self.inner.read().expect("lock poisoned");
        state.reviews.get(review_id).map(|r| r.owner)
    }

    pub fn tx_count(&self) -> u64 {
        self.inner.read().expect("lock poisoned").tx_count
    }

    fn apply(state: &mut LedgerState, from: Address, call: &LedgerCall) -> LedgerResult<Option<Minted>> {
        match call {
            LedgerCall::MintBook {
                owner,
                metadata_uri,
            } => {
                let book_id = BookId::from(state.books.len() as u64 + 1);
                state.books.insert(book_id, BookRecord { owner: *owner });
                state.events.push(LedgerEvent::BookMinted {
                    book_id,
                    owner: *owner,
                    uri: metadata_uri.clone(),
                });
                Ok(Some(Minted::Book(book_id)))
            }
            LedgerCall::MintReview {
                book_id,
                metadata_uri,
            } => {
                if !state.books.contains_key(book_id) {
                    return Err(LedgerError::Reverted {
                        reason: format!("book {book_id} does not exist"),
                    });
                }
                let review_id = ReviewId::from(state.reviews.len() as u64 + 1);
                state.reviews.insert(
                    review_id,
                    ReviewRecord {
                        book_id: *book_id,
                        owner: from,
                    },
                );
                state.events.push(LedgerEvent::ReviewMinted {
                    review_id,
                    book_id: *book_id,
                    owner: from,
                    uri: metadata_uri.clone(),
                });
                Ok(Some(Minted::Review(review_id)))
            }
            LedgerCall::MintLikes { owner, amount } => {
                if amount.is_zero() {
                    return Err(LedgerError::Reverted {
                        reason: "mint amount must be positive".into(),
                    });
                }
                state.credit(*owner, *amount);
                state.events.push(LedgerEvent::LikesMinted {
                    owner: *owner,
                    amount: *amount,
                });
                Ok(None)
            }
            LedgerCall::BatchDistribute {
                book_ids,
                review_ids,
                amounts,
            } => {
                Self::distribute(state, from, book_ids, review_ids, amounts)?;
                Ok(None)
            }
        }
    }

    fn distribute(
        state: &mut LedgerState,
        from: Address,
        book_ids: &[BookId],
        review_ids: &[ReviewId],
        amounts: &[LikeAmount],
    ) -> LedgerResult<()> {
        if book_ids.len() != review_ids.len() || book_ids.len() != amounts.len() {
            return Err(LedgerError::InvalidCall("batch arrays differ in length".into()));
        }
        if book_ids.is_empty() {
            return Err(LedgerError::InvalidCall("empty batch".into()));
        }

        // Validate everything before mutating so the batch is all-or-nothing.
        let mut total = LikeAmount::ZERO;
        let mut transfers = Vec::with_capacity(book_ids.len());
        for ((book_id, review_id), amount) in book_ids.iter().zip(review_ids).zip(amounts) {
            let review = state.reviews.get(review_id).ok_or_else(|| LedgerError::Reverted {
                reason: format!("review {review_id} does not exist"),
            })?;
            if review.book_id != *book_id {
                return Err(LedgerError::Reverted {
                    reason: format!("review {review_id} does not belong to book {book_id}"),
                });
            }
            let book = state.books.get(book_id).ok_or_else(|| LedgerError::Reverted {
                reason: format!("book {book_id} does not exist"),
            })?;
            if amount.is_zero() {
                return Err(LedgerError::Reverted {
                    reason: format!("zero amount for review {review_id}"),
                });
            }
            total = total.checked_add(*amount).ok_or_else(|| LedgerError::Reverted {
                reason: "batch total overflows".into(),
            })?;
            transfers.push((*book_id, *review_id, *amount, review.owner, book.owner));
        }

        let remaining = state
            .balance(&from)
            .checked_sub(total)
            .ok_or_else(|| LedgerError::Reverted {
                reason: format!("insufficient like balance: need {total}"),
            })?;
        state.balances.insert(from, remaining);

        for (book_id, review_id, amount, review_owner, book_owner) in transfers {
            let share = amount.half();
            state.credit(review_owner, share);
            state.credit(book_owner, share);
            state.events.push(LedgerEvent::LikesDistributed {
                book_id,
                review_id,
                amount,
                review_owner,
                book_owner,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit(&self, from: Address, call: &LedgerCall) -> LedgerResult<TxReceipt> {
        let mut state = self.inner.write().expect("lock poisoned");
        if std::mem::take(&mut state.reject_next) {
            tracing::debug!(function = call.function_name(), "submission rejected");
            return Err(LedgerError::Rejected);
        }
        let minted = Self::apply(&mut state, from, call)?;
        let tx_hash = state.next_tx_hash(&from, call);
        tracing::debug!(
            %tx_hash,
            contract = %call.target(),
            function = call.function_name(),
            "transaction applied"
        );
        let receipt = TxReceipt::succeeded(tx_hash.clone(), minted);
        state.receipts.insert(tx_hash, receipt.clone());
        Ok(receipt)
    }

    async fn receipt(&self, tx_hash: &str, _call: &LedgerCall) -> LedgerResult<Option<TxReceipt>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.receipts.get(tx_hash).cloned())
    }

    async fn balance_of(&self, owner: Address) -> LedgerResult<LikeAmount> {
        Ok(self.inner.read().expect("lock poisoned").balance(&owner))
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryLedger")
            .field("books", &state.books.len())
            .field("reviews", &state.reviews.len())
            .field("events", &state.events.len())
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

    const AUTHOR: u8 = 1;
    const REVIEWER: u8 = 2;
    const READER: u8 = 3;

    async fn seeded() -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        ledger
            .submit(
                addr(AUTHOR),
                &LedgerCall::MintBook {
                    owner: addr(AUTHOR),
                    metadata_uri: "ipfs://book".into(),
                },
            )
            .await
            .unwrap();
        ledger
            .submit(
                addr(REVIEWER),
                &LedgerCall::MintReview {
                    book_id: BookId::from(1),
                    metadata_uri: "ipfs://review".into(),
                },
            )
            .await
            .unwrap();
        ledger
            .submit(
                addr(READER),
                &LedgerCall::MintLikes {
                    owner: addr(READER),
                    amount: LikeAmount::from(10),
                },
            )
            .await
            .unwrap();
        ledger
    }

    fn distribute(amount: u64) -> LedgerCall {
        LedgerCall::BatchDistribute {
            book_ids: vec![BookId::from(1)],
            review_ids: vec![ReviewId::from(1)],
            amounts: vec![LikeAmount::from(amount)],
        }
    }

    #[tokio::test]
    async fn receipts_are_kept_for_applied_transactions() {
        let ledger = seeded().await;
        let receipt = ledger.submit(addr(READER), &distribute(4)).await.unwrap();
        let found = ledger.receipt(&receipt.tx_hash, &distribute(4)).await.unwrap();
        assert_eq!(found, Some(receipt));
        assert_eq!(ledger.receipt("0xunknown", &distribute(4)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn mints_assign_sequential_ids() {
        let ledger = seeded().await;
        let receipt = ledger
            .submit(
                addr(AUTHOR),
                &LedgerCall::MintBook {
                    owner: addr(AUTHOR),
                    metadata_uri: "ipfs://second".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(receipt.minted_book(), Some(BookId::from(2)));
        assert_eq!(ledger.review_owner(&ReviewId::from(1)), Some(addr(REVIEWER)));
        assert_eq!(ledger.tx_count(), 4);
    }

    #[tokio::test]
    async fn review_of_missing_book_reverts() {
        let ledger = InMemoryLedger::new();
        let result = ledger
            .submit(
                addr(REVIEWER),
                &LedgerCall::MintReview {
                    book_id: BookId::from(9),
                    metadata_uri: "ipfs://r".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Reverted { .. })));
        assert!(ledger.events().is_empty());
    }

    #[tokio::test]
    async fn distribution_splits_evenly_rounding_down() {
        let ledger = seeded().await;
        ledger.submit(addr(READER), &distribute(5)).await.unwrap();

        assert_eq!(ledger.balance_of(addr(READER)).await.unwrap(), LikeAmount::from(5));
        assert_eq!(ledger.balance_of(addr(REVIEWER)).await.unwrap(), LikeAmount::from(2));
        assert_eq!(ledger.balance_of(addr(AUTHOR)).await.unwrap(), LikeAmount::from(2));
        assert!(matches!(
            ledger.events().last(),
            Some(LedgerEvent::LikesDistributed { amount, .. }) if *amount == LikeAmount::from(5)
        ));
    }

    #[tokio::test]
    async fn failed_batch_moves_nothing() {
        let ledger = seeded().await;
        let call = LedgerCall::BatchDistribute {
            book_ids: vec![BookId::from(1), BookId::from(1)],
            review_ids: vec![ReviewId::from(1), ReviewId::from(7)],
            amounts: vec![LikeAmount::from(2), LikeAmount::from(2)],
        };
        let before = ledger.events().len();
        assert!(matches!(
            ledger.submit(addr(READER), &call).await,
            Err(LedgerError::Reverted { .. })
        ));
        assert_eq!(ledger.balance_of(addr(READER)).await.unwrap(), LikeAmount::from(10));
        assert_eq!(ledger.balance_of(addr(REVIEWER)).await.unwrap(), LikeAmount::ZERO);
        assert_eq!(ledger.events().len(), before);
    }

    #[tokio::test]
    async fn insufficient_balance_reverts() {
        let ledger = seeded().await;
        let result = ledger.submit(addr(READER), &distribute(11)).await;
        assert!(matches!(result, Err(LedgerError::Reverted { .. })));
    }

    #[tokio::test]
    async fn mismatched_review_and_book_reverts() {
        let ledger = seeded().await;
        let call = LedgerCall::BatchDistribute {
            book_ids: vec![BookId::from(2)],
            review_ids: vec![ReviewId::from(1)],
            amounts: vec![LikeAmount::from(1)],
        };
        assert!(ledger.submit(addr(READER), &call).await.is_err());
    }

    #[tokio::test]
    async fn reject_next_affects_one_submission() {
        let ledger = seeded().await;
        ledger.reject_next();
        assert_eq!(
            ledger.submit(addr(READER), &distribute(1)).await,
            Err(LedgerError::Rejected)
        );
        assert!(ledger.submit(addr(READER), &distribute(1)).await.is_ok());
    }

    #[tokio::test]
    async fn events_since_skips_seen() {
        let ledger = seeded().await;
        let fresh = ledger.events_since(2);
        assert_eq!(fresh.len(), 1);
        assert!(matches!(fresh[0], LedgerEvent::LikesMinted { .. }));
    }
}
