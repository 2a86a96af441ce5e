use std::path::Path;

use folio_ledger::ContractAddresses;
use folio_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Base Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 84532;

/// Endpoints, contract addresses and limits for a Folio client.
///
/// Loaded from TOML; every field has a default, so a file only needs the
/// values it changes. Endpoint URLs and the upload JWT can be overridden with
/// `FOLIO_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub subgraph_url: String,
    pub gateway_url: String,
    pub upload_url: String,
    pub upload_jwt: Option<String>,
    pub rpc_url: String,
    pub chain_id: u64,
    pub contracts: ContractAddresses,
    /// Rows fetched per feed query.
    pub feed_size: u32,
    /// Largest amount a single like mint may request.
    pub max_mint: u64,
    /// Owner assigned to newly published books; the publisher when unset.
    pub book_owner: Option<Address>,
    pub tx_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            subgraph_url: "http://localhost:8000/subgraphs/name/folio".into(),
            gateway_url: "https://gateway.pinata.cloud".into(),
            upload_url: "https://api.pinata.cloud".into(),
            upload_jwt: None,
            rpc_url: "https://sepolia.base.org".into(),
            chain_id: DEFAULT_CHAIN_ID,
            contracts: ContractAddresses::default(),
            feed_size: 10,
            max_mint: 10_000,
            book_owner: None,
            tx_timeout_secs: 60,
            poll_interval_ms: 1_000,
        }
    }
}

impl FolioConfig {
    /// Read a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&text)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// `load` when a path is given, defaults plus environment otherwise.
    pub fn load_or_default(path: Option<&Path>) -> SdkResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let mut config = Self::default();
                config.apply_overrides(|key| std::env::var(key).ok());
                Ok(config)
            }
        }
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Override endpoint settings from `lookup`, which maps a variable name
    /// to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut String); 4] = [
            ("FOLIO_SUBGRAPH_URL", &mut self.subgraph_url),
            ("FOLIO_GATEWAY_URL", &mut self.gateway_url),
            ("FOLIO_UPLOAD_URL", &mut self.upload_url),
            ("FOLIO_RPC_URL", &mut self.rpc_url),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }
        if let Some(jwt) = lookup("FOLIO_UPLOAD_JWT") {
            self.upload_jwt = Some(jwt);
        }
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.feed_size == 0 {
            return Err(SdkError::Config("feed_size must be at least 1".into()));
        }
        if self.max_mint == 0 {
            return Err(SdkError::Config("max_mint must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(SdkError::Config("poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}
