//! The like accumulator: the staging area between clicks and the ledger.
//!
//! [`LikeAccumulator`] keeps an insertion-ordered map from [`LikeKey`] to a
//! strictly positive [`LikeAmount`]. Every operation is total: nothing here
//! fails, panics or talks to the ledger.

use indexmap::IndexMap;

use folio_types::{BookId, LikeAmount, ReviewId};

use crate::entry::{LikeBatch, LikeEntry, LikeKey};

/// Per-review like counts waiting to be submitted as one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LikeAccumulator {
    entries: IndexMap<LikeKey, LikeAmount>,
}

impl LikeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stage one more like for a review and return its new amount.
    ///
    /// A review seen for the first time is appended with an amount of one.
    /// The amount saturates at the largest representable value.
    pub fn record_like(&mut self, book_id: BookId, review_id: ReviewId) -> LikeAmount {
        let amount = self
            .entries
            .entry(LikeKey::new(book_id, review_id))
            .and_modify(|a| *a = a.saturating_add(LikeAmount::one()))
            .or_insert_with(LikeAmount::one);
        *amount
    }

    /// Drop the staged entry for a review. The remaining entries keep their
    /// order. Returns whether anything was removed.
    pub fn reset_like(&mut self, book_id: BookId, review_id: ReviewId) -> bool {
        self.entries
            .shift_remove(&LikeKey::new(book_id, review_id))
            .is_some()
    }

    /// Staged amount for a review; `None` when nothing is staged.
    pub fn current_amount_for(&self, book_id: BookId, review_id: ReviewId) -> Option<LikeAmount> {
        self.entries.get(&LikeKey::new(book_id, review_id)).copied()
    }

    /// Staged key for a review id, whatever book it was staged under.
    pub fn key_for_review(&self, review_id: ReviewId) -> Option<LikeKey> {
        self.entries.keys().find(|k| k.review_id == review_id).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = LikeEntry> + '_ {
        self.entries.iter().map(|(key, amount)| LikeEntry {
            book_id: key.book_id,
            review_id: key.review_id,
            amount: *amount,
        })
    }

    pub fn total_amount(&self) -> LikeAmount {
        self.entries.values().sum()
    }

    /// Flatten into parallel sequences in insertion order.
    pub fn to_batch(&self) -> LikeBatch {
        self.entries().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Subtract amounts that have already been distributed. Entries that
    /// reach zero are dropped; likes staged since are kept.
    pub fn deduct(&mut self, entries: impl IntoIterator<Item = LikeEntry>) {
        for entry in entries {
            let key = entry.key();
            let Some(current) = self.entries.get(&key).copied() else {
                continue;
            };
            match current.checked_sub(entry.amount) {
                Some(rest) if !rest.is_zero() => {
                    self.entries.insert(key, rest);
                }
                _ => {
                    self.entries.shift_remove(&key);
                }
            }
        }
    }
}
