//! Staged like entries and the batch they flatten into.

use folio_ledger::LedgerCall;
use folio_types::{BookId, LikeAmount, ReviewId};
use serde::{Deserialize, Serialize};

/// Identifies the review a like is granted to. Review ids are only unique
/// within the review contract, so the parent book is part of the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LikeKey {
    pub book_id: BookId,
    pub review_id: ReviewId,
}

impl LikeKey {
    pub fn new(book_id: BookId, review_id: ReviewId) -> Self {
        Self { book_id, review_id }
    }
}

/// One staged instruction: grant `amount` likes to a review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEntry {
    pub book_id: BookId,
    pub review_id: ReviewId,
    pub amount: LikeAmount,
}

impl LikeEntry {
    pub fn key(&self) -> LikeKey {
        LikeKey::new(self.book_id, self.review_id)
    }
}

/// Staged likes as three parallel sequences. Index `i` across all three
/// describes one instruction, and the lengths are always equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeBatch {
    pub book_ids: Vec<BookId>,
    pub review_ids: Vec<ReviewId>,
    pub amounts: Vec<LikeAmount>,
}

impl LikeBatch {
    pub fn len(&self) -> usize {
        self.book_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book_ids.is_empty()
    }

    /// Iterate the batch back as entries, in order.
    pub fn entries(&self) -> impl Iterator<Item = LikeEntry> + '_ {
        self.book_ids
            .iter()
            .zip(&self.review_ids)
            .zip(&self.amounts)
            .map(|((book_id, review_id), amount)| LikeEntry {
                book_id: *book_id,
                review_id: *review_id,
                amount: *amount,
            })
    }

    /// The ledger call that distributes this batch.
    pub fn to_call(&self) -> LedgerCall {
        LedgerCall::BatchDistribute {
            book_ids: self.book_ids.clone(),
            review_ids: self.review_ids.clone(),
            amounts: self.amounts.clone(),
        }
    }
}

impl FromIterator<LikeEntry> for LikeBatch {
    fn from_iter<I: IntoIterator<Item = LikeEntry>>(iter: I) -> Self {
        let mut batch = LikeBatch::default();
        for entry in iter {
            batch.book_ids.push(entry.book_id);
            batch.review_ids.push(entry.review_id);
            batch.amounts.push(entry.amount);
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_serializes_with_contract_names() {
        let batch: LikeBatch = [LikeEntry {
            book_id: BookId::from(1),
            review_id: ReviewId::from(10),
            amount: LikeAmount::from(2),
        }]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["bookIds"][0], "1");
        assert_eq!(json["reviewIds"][0], "10");
        assert_eq!(json["amounts"][0], "2");
    }

    #[test]
    fn to_call_is_batch_distribute() {
        let batch = LikeBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.to_call().function_name(), "batchDistribute");
    }
}
