use std::fmt;
use std::str::FromStr;

use primitive_types::H160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A 20-byte EVM account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(H160);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// The zero address.
    pub const fn zero() -> Self {
        Self(H160([0u8; 20]))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_fixed_bytes()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_bytes()))
    }

    /// `0x000...000` form used in compact listings: the first five and last
    /// three characters of the hex string.
    pub fn abbreviate(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..5], &full[full.len() - 3..])
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix("0x")
            .or_else(|| s.trim().strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidHex(s.to_string()))?;
        let bytes = hex::decode(digits).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(TypeError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        Ok(Self(H160::from_slice(&bytes)))
    }
}

impl From<H160> for Address {
    fn from(h: H160) -> Self {
        Self(h)
    }
}

impl From<Address> for H160 {
    fn from(a: Address) -> Self {
        a.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.abbreviate())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
