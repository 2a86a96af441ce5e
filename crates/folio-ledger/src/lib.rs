//! Ledger clients for the Folio contract suite.
//!
//! Books, reviews and like balances are tokens on an EVM chain. This crate
//! models the state-changing calls Folio makes against those contracts as
//! [`LedgerCall`] values and submits them through the [`LedgerClient`] trait:
//!
//! - [`JsonRpcLedger`] -- ABI-encodes calls and sends them to a node
//! - [`InMemoryLedger`] -- simulates the contracts for tests and demos
//!
//! A batch distribution moves likes from the sender to the owners of each
//! review and its book, half each, rounding down.

pub mod abi;
pub mod call;
pub mod error;
pub mod jsonrpc;
pub mod memory;
pub mod traits;

pub use call::{ContractAddresses, ContractKind, LedgerCall, Minted, TxReceipt, TxStatus};
pub use error::{LedgerError, LedgerResult};
pub use jsonrpc::JsonRpcLedger;
pub use memory::{InMemoryLedger, LedgerEvent};
pub use traits::LedgerClient;
