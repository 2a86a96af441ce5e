//! High-level SDK for Folio.
//!
//! [`Folio`] is the main entry point for applications. It composes the three
//! external collaborators behind their traits:
//!
//! - a [`ContentStore`] holding metadata documents and cover images
//! - a [`QueryClient`] over the indexed book, review and like events
//! - a [`LedgerClient`] for minting and like distribution
//!
//! [`Folio::connect`] builds network clients from a [`FolioConfig`];
//! [`Folio::local`] wires everything in memory.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod feed;
pub mod local;
pub mod logging;

pub use client::Folio;
pub use config::{FolioConfig, DEFAULT_CHAIN_ID};
pub use draft::{BookDraft, Published};
pub use error::{SdkError, SdkResult};
pub use feed::{BookDetail, Resolved, ResolvedBook, ResolvedReview};
pub use local::LocalChain;
pub use logging::{init_logging, LogFormat};

// Re-export key types
pub use folio_content::ContentStore;
pub use folio_ledger::{ContractAddresses, LedgerClient, TxReceipt};
pub use folio_likes::{DistributionLine, DistributionSummary, LikeSession, SubmissionState};
pub use folio_query::QueryClient;
pub use folio_types::{
    Address, BookId, BookMetadata, ContentId, LikeAmount, ReviewId, ReviewMetadata,
};
