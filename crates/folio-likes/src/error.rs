//! Error types for like submission.

use folio_ledger::LedgerError;
use folio_types::ReviewId;

/// Errors that can occur while staging or submitting likes.
#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    /// The review is not part of the loaded feed.
    #[error("review {0} is not in the current feed")]
    UnknownReview(ReviewId),

    /// Submit was called with nothing staged.
    #[error("no likes staged")]
    NothingStaged,

    /// A previous submission has not settled.
    #[error("a like submission is already in flight")]
    SubmissionInFlight,

    /// A batch was broadcast but never confirmed. It may still land, so
    /// nothing is resent until it is settled.
    #[error("batch {tx_hash} was sent but is not confirmed yet")]
    Unconfirmed { tx_hash: String },

    /// The ledger refused or failed the batch. Staged likes are kept.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Convenience alias for like results.
pub type LikeResult<T> = Result<T, LikeError>;
