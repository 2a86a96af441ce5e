//! JSON-RPC client for an EVM node that holds the sender's keys.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use folio_types::{Address, BookId, LikeAmount, ReviewId, U256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::abi;
use crate::call::{ContractAddresses, ContractKind, LedgerCall, Minted, TxReceipt};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::LedgerClient;

/// EIP-1193 code for a request the user declined.
const USER_REJECTED: i64 = 4001;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcReceipt {
    status: Option<String>,
    #[serde(default)]
    logs: Vec<RpcLog>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    address: Address,
    #[serde(default)]
    topics: Vec<String>,
}

/// Ledger client speaking Ethereum JSON-RPC.
///
/// Transactions are sent with `eth_sendTransaction`, so signing happens in
/// the node or wallet behind `url`. `submit` then polls for the receipt until
/// it is mined or `tx_timeout` elapses. With a chain id set, every send first
/// checks `eth_chainId` and refuses to transact on any other chain.
pub struct JsonRpcLedger {
    http: reqwest::Client,
    url: String,
    contracts: ContractAddresses,
    chain_id: Option<u64>,
    poll_interval: Duration,
    tx_timeout: Duration,
    request_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(url: impl Into<String>, contracts: ContractAddresses) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            url: url.into(),
            contracts,
            chain_id: None,
            poll_interval: Duration::from_secs(1),
            tx_timeout: Duration::from_secs(60),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn with_polling(mut self, poll_interval: Duration, tx_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.tx_timeout = tx_timeout;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    async fn call_optional<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> LedgerResult<Option<R>> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response: JsonRpcResponse<R> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(rpc_error(error));
        }
        Ok(response.result)
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> LedgerResult<R> {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| LedgerError::Rpc {
                code: 0,
                message: format!("{method} returned no result"),
            })
    }

    async fn ensure_chain(&self) -> LedgerResult<()> {
        let Some(expected) = self.chain_id else {
            return Ok(());
        };
        let reported: String = self.call("eth_chainId", json!([])).await?;
        check_chain(expected, &reported)
    }

    async fn fetch_receipt(&self, tx_hash: &str) -> LedgerResult<Option<RpcReceipt>> {
        self.call_optional("eth_getTransactionReceipt", json!([tx_hash]))
            .await
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> LedgerResult<RpcReceipt> {
        let deadline = Instant::now() + self.tx_timeout;
        loop {
            if let Some(receipt) = self.fetch_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(LedgerError::Timeout {
                    tx_hash: tx_hash.to_string(),
                    secs: self.tx_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn rpc_error(error: JsonRpcError) -> LedgerError {
    if error.code == USER_REJECTED {
        LedgerError::Rejected
    } else {
        LedgerError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

fn check_chain(expected: u64, reported: &str) -> LedgerResult<()> {
    let digits = reported
        .strip_prefix("0x")
        .or_else(|| reported.strip_prefix("0X"))
        .unwrap_or(reported);
    let actual = u64::from_str_radix(digits, 16).map_err(|_| LedgerError::Rpc {
        code: 0,
        message: format!("malformed chain id {reported:?}"),
    })?;
    if actual != expected {
        return Err(LedgerError::WrongChain { expected, actual });
    }
    Ok(())
}

/// Token id of the first mint (`Transfer` from the zero address) emitted by
/// `contract` in the receipt's logs.
fn minted_token(logs: &[RpcLog], contract: Address) -> Option<U256> {
    let zero_topic = abi::to_hex(&[0u8; 32]);
    logs.iter()
        .filter(|log| log.address == contract && log.topics.len() == 4)
        .find(|log| {
            log.topics[0].eq_ignore_ascii_case(abi::TRANSFER_TOPIC) && log.topics[1] == zero_topic
        })
        .and_then(|log| abi::from_hex(&log.topics[3]).ok())
        .and_then(|data| abi::decode_uint(&data).ok())
}

fn settle(
    tx_hash: String,
    receipt: RpcReceipt,
    call: &LedgerCall,
    contract: Address,
) -> LedgerResult<TxReceipt> {
    match receipt.status.as_deref() {
        Some("0x1") => {}
        Some("0x0") => {
            return Err(LedgerError::Reverted {
                reason: format!("transaction {tx_hash} reverted"),
            })
        }
        other => {
            return Err(LedgerError::Rpc {
                code: 0,
                message: format!("unexpected receipt status {other:?}"),
            })
        }
    }

    let minted = match call.target() {
        ContractKind::Book => {
            minted_token(&receipt.logs, contract).map(|id| Minted::Book(BookId::new(id)))
        }
        ContractKind::Review => {
            minted_token(&receipt.logs, contract).map(|id| Minted::Review(ReviewId::new(id)))
        }
        ContractKind::Like => None,
    };
    Ok(TxReceipt::succeeded(tx_hash, minted))
}

#[async_trait]
impl LedgerClient for JsonRpcLedger {
    async fn submit(&self, from: Address, call: &LedgerCall) -> LedgerResult<TxReceipt> {
        let data = abi::calldata(call)?;
        let contract = self.contracts.address_of(call.target());
        let mut tx = json!({
            "from": from,
            "to": contract,
            "data": abi::to_hex(&data),
        });
        if let Some(chain_id) = self.chain_id {
            tx["chainId"] = json!(format!("0x{chain_id:x}"));
        }

        self.ensure_chain().await?;

        let tx_hash: String = self.call("eth_sendTransaction", json!([tx])).await?;
        tracing::info!(
            %tx_hash,
            contract = %call.target(),
            function = call.function_name(),
            "transaction sent"
        );

        let receipt = self.wait_for_receipt(&tx_hash).await?;
        let settled = settle(tx_hash, receipt, call, contract)?;
        tracing::debug!(tx_hash = %settled.tx_hash, "transaction mined");
        Ok(settled)
    }

    async fn receipt(&self, tx_hash: &str, call: &LedgerCall) -> LedgerResult<Option<TxReceipt>> {
        let contract = self.contracts.address_of(call.target());
        self.fetch_receipt(tx_hash)
            .await?
            .map(|receipt| settle(tx_hash.to_string(), receipt, call, contract))
            .transpose()
    }

    async fn balance_of(&self, owner: Address) -> LedgerResult<LikeAmount> {
        let params = json!([
            {"to": self.contracts.like, "data": abi::to_hex(&abi::balance_of_calldata(&owner))},
            "latest"
        ]);
        let result: String = self.call("eth_call", params).await?;
        let balance = abi::decode_uint(&abi::from_hex(&result)?)?;
        Ok(LikeAmount::new(balance))
    }
}

impl std::fmt::Debug for JsonRpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcLedger")
            .field("url", &self.url)
            .field("contracts", &self.contracts)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
