use async_trait::async_trait;
use folio_types::{Address, LikeAmount};

use crate::call::{LedgerCall, TxReceipt};
use crate::error::LedgerResult;

/// Write and balance-read boundary for the Folio contract suite.
///
/// `submit` resolves once the transaction is settled: `Ok` carries the
/// successful receipt, every failure mode is an `Err`. The future itself is
/// the pending phase.
///
/// [`LedgerError::Timeout`](crate::LedgerError::Timeout) is the one error
/// that does not mean failure: the transaction was broadcast and may still
/// land, so it must be settled through [`LedgerClient::receipt`] before
/// anything resends it.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit(&self, from: Address, call: &LedgerCall) -> LedgerResult<TxReceipt>;

    /// Settle a transaction sent earlier for `call`. `Ok(None)` while it is
    /// not mined; a mined but reverted transaction is an `Err`.
    async fn receipt(&self, tx_hash: &str, call: &LedgerCall) -> LedgerResult<Option<TxReceipt>>;

    async fn balance_of(&self, owner: Address) -> LedgerResult<LikeAmount>;
}
