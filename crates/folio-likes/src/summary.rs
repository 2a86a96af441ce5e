//! Confirmation snapshot of a submitted like batch.

use folio_query::ReviewRow;
use folio_types::{Address, BookId, LikeAmount, ReviewId};
use serde::{Deserialize, Serialize};

use crate::entry::LikeEntry;

/// One submitted instruction with the split the ledger applies to it.
///
/// The shares are informational. The ledger gives half of `amount` to each
/// owner, rounding down, and this mirrors that for confirmation text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionLine {
    pub book_id: BookId,
    pub review_id: ReviewId,
    pub amount: LikeAmount,
    pub review_owner: Option<Address>,
    pub book_owner: Option<Address>,
    pub review_owner_share: LikeAmount,
    pub book_owner_share: LikeAmount,
}

impl DistributionLine {
    fn new(entry: LikeEntry, row: Option<&ReviewRow>) -> Self {
        Self {
            book_id: entry.book_id,
            review_id: entry.review_id,
            amount: entry.amount,
            review_owner: row.map(|r| r.owner),
            book_owner: row.map(|r| r.book.owner),
            review_owner_share: entry.amount.half(),
            book_owner_share: entry.amount.half(),
        }
    }
}

/// What a successful batch distributed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub tx_hash: String,
    pub lines: Vec<DistributionLine>,
}

impl DistributionSummary {
    /// Build a summary, taking owners from the feed rows the likes were staged
    /// against. Entries whose review is missing from `feed` get no owners.
    pub fn new(
        tx_hash: impl Into<String>,
        entries: impl IntoIterator<Item = LikeEntry>,
        feed: &[ReviewRow],
    ) -> Self {
        let lines = entries
            .into_iter()
            .map(|entry| {
                let row = feed
                    .iter()
                    .find(|r| r.review_id == entry.review_id && r.book_id() == entry.book_id);
                DistributionLine::new(entry, row)
            })
            .collect();
        Self {
            tx_hash: tx_hash.into(),
            lines,
        }
    }

    pub fn total_amount(&self) -> LikeAmount {
        self.lines.iter().map(|l| l.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
