/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("transaction rejected by the signer")]
    Rejected,

    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },

    #[error("invalid call: {0}")]
    InvalidCall(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transaction {tx_hash} not mined within {secs}s")]
    Timeout { tx_hash: String, secs: u64 },

    #[error("abi error: {0}")]
    Abi(String),

    #[error("node is on chain {actual}, expected chain {expected}")]
    WrongChain { expected: u64, actual: u64 },
}

impl LedgerError {
    /// Hash of a transaction whose outcome is not known yet.
    pub fn unsettled_tx(&self) -> Option<&str> {
        match self {
            LedgerError::Timeout { tx_hash, .. } => Some(tx_hash),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        LedgerError::Transport(e.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
