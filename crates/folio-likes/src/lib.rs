//! Like staging and batch submission for Folio.
//!
//! Readers like reviews one click at a time; the ledger wants a single
//! batched distribution. This crate sits between the two.
//!
//! # Key Types
//!
//! - [`LikeAccumulator`] -- insertion-ordered staging area keyed by review
//! - [`LikeBatch`] -- staged likes as parallel book/review/amount sequences
//! - [`LikeSession`] -- stages against a review feed and submits to a ledger
//! - [`DistributionSummary`] -- what a successful batch distributed

pub mod accumulator;
pub mod entry;
pub mod error;
pub mod session;
pub mod summary;

pub use accumulator::LikeAccumulator;
pub use entry::{LikeBatch, LikeEntry, LikeKey};
pub use error::{LikeError, LikeResult};
pub use session::{LikeSession, SubmissionState};
pub use summary::{DistributionLine, DistributionSummary};
