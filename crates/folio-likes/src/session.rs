//! Submission protocol around the accumulator.
//!
//! A [`LikeSession`] owns one accumulator and the review feed it was staged
//! against. Likes are staged by review id, then flushed to the ledger as a
//! single batch distribution. The batch is all-or-nothing: on failure every
//! staged like is kept so the user can retry.
//!
//! A batch that was broadcast but timed out waiting for its receipt is held
//! as unconfirmed. Submitting is refused until [`LikeSession::settle`] learns
//! whether it landed, so one batch is never distributed twice.

use std::sync::Arc;

use folio_ledger::{LedgerClient, LedgerError};
use folio_query::ReviewRow;
use folio_types::{Address, LikeAmount, ReviewId};
use serde::{Deserialize, Serialize};

use crate::accumulator::LikeAccumulator;
use crate::entry::{LikeBatch, LikeKey};
use crate::error::{LikeError, LikeResult};
use crate::summary::DistributionSummary;

/// Where the session is in the submit cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Pending,
    Succeeded,
    Failed(String),
    /// Broadcast with this tx hash, outcome unknown.
    Unconfirmed(String),
}

/// One user's staged likes plus the feed they were staged from.
pub struct LikeSession<L: LedgerClient + ?Sized = dyn LedgerClient> {
    ledger: Arc<L>,
    feed: Vec<ReviewRow>,
    accumulator: LikeAccumulator,
    state: SubmissionState,
    confirmation: Option<DistributionSummary>,
    in_doubt: Option<LikeBatch>,
}

impl<L: LedgerClient + ?Sized> LikeSession<L> {
    pub fn new(ledger: Arc<L>, feed: Vec<ReviewRow>) -> Self {
        Self {
            ledger,
            feed,
            accumulator: LikeAccumulator::new(),
            state: SubmissionState::Idle,
            confirmation: None,
            in_doubt: None,
        }
    }

    pub fn feed(&self) -> &[ReviewRow] {
        &self.feed
    }

    pub fn accumulator(&self) -> &LikeAccumulator {
        &self.accumulator
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The last successful distribution, until acknowledged.
    pub fn confirmation(&self) -> Option<&DistributionSummary> {
        self.confirmation.as_ref()
    }

    fn row(&self, review_id: ReviewId) -> Option<&ReviewRow> {
        self.feed.iter().find(|r| r.review_id == review_id)
    }

    /// Stage a like for a review in the feed and return its staged amount.
    pub fn like_review(&mut self, review_id: ReviewId) -> LikeResult<LikeAmount> {
        let book_id = self
            .row(review_id)
            .map(ReviewRow::book_id)
            .ok_or(LikeError::UnknownReview(review_id))?;
        let amount = self.accumulator.record_like(book_id, review_id);
        tracing::debug!(%review_id, %book_id, %amount, "like staged");
        Ok(amount)
    }

    /// Drop whatever is staged for a review. Returns whether anything was.
    pub fn reset_review(&mut self, review_id: ReviewId) -> bool {
        match self.key_for(review_id) {
            Some(key) => self.accumulator.reset_like(key.book_id, key.review_id),
            None => false,
        }
    }

    /// Staged amount for a review in the feed.
    pub fn amount_for(&self, review_id: ReviewId) -> Option<LikeAmount> {
        let key = self.key_for(review_id)?;
        self.accumulator.current_amount_for(key.book_id, key.review_id)
    }

    /// Feed row first, then whatever is staged, so reviews that dropped out of
    /// a refreshed feed stay reachable.
    fn key_for(&self, review_id: ReviewId) -> Option<LikeKey> {
        self.row(review_id)
            .map(|r| LikeKey::new(r.book_id(), review_id))
            .or_else(|| self.accumulator.key_for_review(review_id))
    }

    /// Send every staged like as one batch distribution from `from`.
    ///
    /// On success the submitted entries become the confirmation snapshot and
    /// the accumulator is cleared. On failure the accumulator is untouched and
    /// the state records the error message. A timeout leaves the batch
    /// unconfirmed and blocks further submits until [`Self::settle`].
    pub async fn submit(&mut self, from: Address) -> LikeResult<DistributionSummary> {
        match &self.state {
            SubmissionState::Pending => return Err(LikeError::SubmissionInFlight),
            SubmissionState::Unconfirmed(tx_hash) => {
                return Err(LikeError::Unconfirmed {
                    tx_hash: tx_hash.clone(),
                })
            }
            _ => {}
        }
        if self.accumulator.is_empty() {
            return Err(LikeError::NothingStaged);
        }

        let batch = self.accumulator.to_batch();
        tracing::info!(
            entries = batch.len(),
            total = %self.accumulator.total_amount(),
            "submitting like batch"
        );
        self.state = SubmissionState::Pending;

        match self.ledger.submit(from, &batch.to_call()).await {
            Ok(receipt) => {
                let summary =
                    DistributionSummary::new(receipt.tx_hash, batch.entries(), &self.feed);
                self.confirmation = Some(summary.clone());
                self.accumulator.clear();
                self.state = SubmissionState::Succeeded;
                tracing::info!(tx_hash = %summary.tx_hash, "like batch distributed");
                Ok(summary)
            }
            Err(e) => {
                if let Some(tx_hash) = e.unsettled_tx() {
                    tracing::warn!(%tx_hash, "like batch sent but not confirmed");
                    self.state = SubmissionState::Unconfirmed(tx_hash.to_string());
                    self.in_doubt = Some(batch);
                } else {
                    tracing::warn!(error = %e, "like batch failed");
                    self.state = SubmissionState::Failed(e.to_string());
                }
                Err(LikeError::Ledger(e))
            }
        }
    }

    /// Look up the outcome of an unconfirmed batch.
    ///
    /// Returns the summary once it has landed, `Ok(None)` while it is still
    /// unmined or when nothing is unconfirmed. A revert releases the staged
    /// likes for another submit; any other error leaves the batch unconfirmed.
    pub async fn settle(&mut self) -> LikeResult<Option<DistributionSummary>> {
        let SubmissionState::Unconfirmed(tx_hash) = &self.state else {
            return Ok(None);
        };
        let Some(batch) = self.in_doubt.as_ref() else {
            return Ok(None);
        };
        let tx_hash = tx_hash.clone();

        match self.ledger.receipt(&tx_hash, &batch.to_call()).await {
            Ok(Some(receipt)) => {
                let summary =
                    DistributionSummary::new(receipt.tx_hash, batch.entries(), &self.feed);
                self.accumulator.deduct(batch.entries());
                self.in_doubt = None;
                self.confirmation = Some(summary.clone());
                self.state = SubmissionState::Succeeded;
                tracing::info!(%tx_hash, "unconfirmed like batch landed");
                Ok(Some(summary))
            }
            Ok(None) => {
                tracing::debug!(%tx_hash, "like batch still unmined");
                Ok(None)
            }
            Err(e @ LedgerError::Reverted { .. }) => {
                tracing::warn!(%tx_hash, error = %e, "unconfirmed like batch reverted");
                self.in_doubt = None;
                self.state = SubmissionState::Failed(e.to_string());
                Err(LikeError::Ledger(e))
            }
            Err(e) => Err(LikeError::Ledger(e)),
        }
    }

    /// Give up on an unconfirmed batch known to have been dropped, so the
    /// staged likes can be sent again.
    pub fn discard_unconfirmed(&mut self) {
        if let SubmissionState::Unconfirmed(tx_hash) = &self.state {
            tracing::warn!(%tx_hash, "discarding unconfirmed like batch");
            self.in_doubt = None;
            self.state = SubmissionState::Idle;
        }
    }

    /// Dismiss the confirmation snapshot and return to idle.
    ///
    /// Also unlocks a session whose submit future was dropped while pending.
    /// An unconfirmed batch stays unconfirmed.
    pub fn acknowledge(&mut self) {
        self.confirmation = None;
        if !matches!(self.state, SubmissionState::Unconfirmed(_)) {
            self.state = SubmissionState::Idle;
        }
    }

    /// Swap in a refreshed feed. Staged likes are kept.
    pub fn replace_feed(&mut self, feed: Vec<ReviewRow>) {
        self.feed = feed;
    }
}

impl<L: LedgerClient + ?Sized> std::fmt::Debug for LikeSession<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeSession")
            .field("feed", &self.feed.len())
            .field("staged", &self.accumulator.len())
            .field("state", &self.state)
            .finish()
    }
}
