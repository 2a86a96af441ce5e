use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// URI scheme marker for content held in the content store.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Opaque identifier of a blob in the content store.
///
/// Contracts and metadata documents refer to content as `ipfs://<cid>`; the
/// store itself is addressed by the bare `<cid>`. A `ContentId` always holds
/// the bare form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a bare content id.
    pub fn new(cid: impl Into<String>) -> Result<Self, TypeError> {
        let cid = cid.into();
        let cid = cid.trim();
        if cid.is_empty() {
            return Err(TypeError::EmptyContentId);
        }
        Ok(Self(cid.to_string()))
    }

    /// Parse either a bare id or an `ipfs://` URI.
    pub fn from_uri(uri: &str) -> Result<Self, TypeError> {
        Self::new(uri.trim().strip_prefix(IPFS_SCHEME).unwrap_or(uri))
    }

    /// Like [`ContentId::from_uri`], but only accepts `ipfs://` URIs.
    ///
    /// Returns `None` for anything else, which callers treat as "no content
    /// to load" rather than an error.
    pub fn from_ipfs_uri(uri: &str) -> Option<Self> {
        uri.trim()
            .strip_prefix(IPFS_SCHEME)
            .and_then(|cid| Self::new(cid).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `ipfs://<cid>` form stored on chain.
    pub fn to_uri(&self) -> String {
        format!("{IPFS_SCHEME}{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uri(s)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
