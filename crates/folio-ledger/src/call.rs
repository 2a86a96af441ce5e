use std::fmt;

use folio_types::{Address, BookId, LikeAmount, ReviewId};
use serde::{Deserialize, Serialize};

/// The three contracts of the Folio suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    Book,
    Review,
    Like,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Book => write!(f, "Book"),
            ContractKind::Review => write!(f, "Review"),
            ContractKind::Like => write!(f, "Like"),
        }
    }
}

/// Deployed addresses of the contract suite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    pub book: Address,
    pub review: Address,
    pub like: Address,
}

impl ContractAddresses {
    pub fn address_of(&self, kind: ContractKind) -> Address {
        match kind {
            ContractKind::Book => self.book,
            ContractKind::Review => self.review,
            ContractKind::Like => self.like,
        }
    }
}

/// A state-changing call against one of the contracts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum LedgerCall {
    /// Mint a book token to `owner`, pointing at its metadata document.
    MintBook { owner: Address, metadata_uri: String },

    /// Mint a review of `book_id`, owned by the sender.
    MintReview { book_id: BookId, metadata_uri: String },

    /// Mint `amount` likes to `owner`.
    MintLikes { owner: Address, amount: LikeAmount },

    /// Distribute likes from the sender. Index `i` across the three vectors
    /// is one instruction; the vectors must have equal length.
    BatchDistribute {
        book_ids: Vec<BookId>,
        review_ids: Vec<ReviewId>,
        amounts: Vec<LikeAmount>,
    },
}

impl LedgerCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            LedgerCall::MintBook { .. } | LedgerCall::MintReview { .. } | LedgerCall::MintLikes { .. } => {
                "mint"
            }
            LedgerCall::BatchDistribute { .. } => "batchDistribute",
        }
    }

    /// Canonical Solidity signature, the input to the function selector.
    pub fn signature(&self) -> &'static str {
        match self {
            LedgerCall::MintBook { .. } => "mint(address,string)",
            LedgerCall::MintReview { .. } => "mint(uint256,string)",
            LedgerCall::MintLikes { .. } => "mint(address,uint256)",
            LedgerCall::BatchDistribute { .. } => "batchDistribute(uint256[],uint256[],uint256[])",
        }
    }

    pub fn target(&self) -> ContractKind {
        match self {
            LedgerCall::MintBook { .. } => ContractKind::Book,
            LedgerCall::MintReview { .. } => ContractKind::Review,
            LedgerCall::MintLikes { .. } | LedgerCall::BatchDistribute { .. } => ContractKind::Like,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Token minted by a successful call, when the ledger reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Minted {
    Book(BookId),
    Review(ReviewId),
}

/// Outcome of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub status: TxStatus,
    pub minted: Option<Minted>,
}

impl TxReceipt {
    pub fn succeeded(tx_hash: impl Into<String>, minted: Option<Minted>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            status: TxStatus::Succeeded,
            minted,
        }
    }

    pub fn minted_book(&self) -> Option<BookId> {
        match self.minted {
            Some(Minted::Book(id)) => Some(id),
            _ => None,
        }
    }

    pub fn minted_review(&self) -> Option<ReviewId> {
        match self.minted {
            Some(Minted::Review(id)) => Some(id),
            _ => None,
        }
    }
}
