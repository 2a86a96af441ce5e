//! 256-bit on-chain integers: book ids, review ids and like amounts.
//!
//! Contract identifiers and token amounts are `uint256` on chain, so every
//! value here wraps a [`U256`]. The indexer reports them as decimal strings;
//! JSON-RPC reports them as `0x` hex. Both forms parse.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

fn parse_u256(s: &str) -> Result<U256, TypeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TypeError::InvalidInteger(s.to_string()));
    }
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => U256::from_str_radix(digits, 16)
            .map_err(|_| TypeError::InvalidInteger(s.to_string())),
        None => U256::from_dec_str(s).map_err(|_| TypeError::InvalidInteger(s.to_string())),
    }
}

struct U256Visitor;

impl<'de> de::Visitor<'de> for U256Visitor {
    type Value = U256;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string, a 0x hex string, or an unsigned integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<U256, E> {
        parse_u256(value).map_err(de::Error::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<U256, E> {
        Ok(U256::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<U256, E> {
        Ok(U256::from(value))
    }
}

macro_rules! uint_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(U256);

        impl $name {
            pub const fn new(value: U256) -> Self {
                Self(value)
            }

            pub fn as_u256(&self) -> U256 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(U256::from(v))
            }
        }

        impl From<U256> for $name {
            fn from(v: U256) -> Self {
                Self(v)
            }
        }

        impl From<$name> for U256 {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_u256(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(U256Visitor).map(Self)
            }
        }
    };
}

uint_newtype! {
    /// Token id of a book on the book contract.
    BookId
}

uint_newtype! {
    /// Token id of a review on the review contract.
    ReviewId
}

uint_newtype! {
    /// A count of like tokens.
    LikeAmount
}

impl LikeAmount {
    pub const ZERO: LikeAmount = LikeAmount(U256::zero());

    pub fn one() -> Self {
        Self(U256::one())
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// One side of a 50/50 split, rounded down.
    pub fn half(self) -> Self {
        Self(self.0 / U256::from(2u8))
    }
}

impl Sum for LikeAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(LikeAmount::ZERO, LikeAmount::saturating_add)
    }
}

impl<'a> Sum<&'a LikeAmount> for LikeAmount {
    fn sum<I: Iterator<Item = &'a LikeAmount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!("42".parse::<BookId>().unwrap(), BookId::from(42));
        assert_eq!("0x2a".parse::<BookId>().unwrap(), BookId::from(42));
        assert_eq!(" 7 ".parse::<ReviewId>().unwrap(), ReviewId::from(7));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<BookId>().is_err());
        assert!("abc".parse::<BookId>().is_err());
        assert!("0xzz".parse::<LikeAmount>().is_err());
        assert!("-1".parse::<LikeAmount>().is_err());
    }

    #[test]
    fn holds_values_wider_than_u128() {
        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let id: ReviewId = big.parse().unwrap();
        assert_eq!(id.to_string(), big);
        assert_eq!(id.as_u256(), U256::MAX);
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(LikeAmount::from(255).to_string(), "255");
        assert_eq!(format!("{:?}", BookId::from(3)), "BookId(3)");
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let json = serde_json::to_string(&BookId::from(12)).unwrap();
        assert_eq!(json, "\"12\"");
        let parsed: BookId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(parsed, BookId::from(12));
        let from_number: LikeAmount = serde_json::from_str("5").unwrap();
        assert_eq!(from_number, LikeAmount::from(5));
    }

    #[test]
    fn half_rounds_down() {
        assert_eq!(LikeAmount::from(5).half(), LikeAmount::from(2));
        assert_eq!(LikeAmount::from(1).half(), LikeAmount::ZERO);
        assert_eq!(LikeAmount::from(10).half(), LikeAmount::from(5));
    }

    #[test]
    fn sum_and_saturation() {
        let total: LikeAmount = [1u64, 2, 3].into_iter().map(LikeAmount::from).sum();
        assert_eq!(total, LikeAmount::from(6));

        let max = LikeAmount::new(U256::MAX);
        assert_eq!(max.saturating_add(LikeAmount::one()), max);
        assert_eq!(LikeAmount::from(1).checked_sub(LikeAmount::from(2)), None);
    }
}
