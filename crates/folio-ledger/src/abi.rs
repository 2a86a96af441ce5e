//! Minimal Solidity ABI encoding for the calls the suite exposes.
//!
//! Only the types the contracts take are supported: `address`, `uint256`,
//! `string` and `uint256[]`.

use folio_types::{Address, U256};
use sha3::{Digest, Keccak256};

use crate::call::LedgerCall;
use crate::error::{LedgerError, LedgerResult};

const WORD: usize = 32;

/// `keccak256("Transfer(address,address,uint256)")`, emitted on every mint.
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// An ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    String(String),
    UintArray(Vec<U256>),
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn encode_tail(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::String(s) => {
            let bytes = s.as_bytes();
            out.extend_from_slice(&uint_word(U256::from(bytes.len() as u64)));
            out.extend_from_slice(bytes);
            let padding = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(padding));
        }
        Token::UintArray(values) => {
            out.extend_from_slice(&uint_word(U256::from(values.len() as u64)));
            for value in values {
                out.extend_from_slice(&uint_word(*value));
            }
        }
        Token::Address(_) | Token::Uint(_) => {}
    }
}

/// Head/tail encoding of a tuple of arguments.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(a) => head.extend_from_slice(&address_word(a)),
            Token::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            Token::String(_) | Token::UintArray(_) => {
                let offset = (head_len + tail.len()) as u64;
                head.extend_from_slice(&uint_word(U256::from(offset)));
                encode_tail(token, &mut tail);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

pub fn encode_function(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(&encode(tokens));
    data
}

fn uints<T: Copy + Into<U256>>(values: &[T]) -> Token {
    Token::UintArray(values.iter().map(|v| (*v).into()).collect())
}

/// Calldata for a ledger call.
pub fn calldata(call: &LedgerCall) -> LedgerResult<Vec<u8>> {
    let tokens = match call {
        LedgerCall::MintBook {
            owner,
            metadata_uri,
        } => vec![Token::Address(*owner), Token::String(metadata_uri.clone())],
        LedgerCall::MintReview {
            book_id,
            metadata_uri,
        } => vec![Token::Uint(book_id.as_u256()), Token::String(metadata_uri.clone())],
        LedgerCall::MintLikes { owner, amount } => {
            vec![Token::Address(*owner), Token::Uint(amount.as_u256())]
        }
        LedgerCall::BatchDistribute {
            book_ids,
            review_ids,
            amounts,
        } => {
            if book_ids.len() != review_ids.len() || book_ids.len() != amounts.len() {
                return Err(LedgerError::InvalidCall(format!(
                    "batch arrays differ in length: {} books, {} reviews, {} amounts",
                    book_ids.len(),
                    review_ids.len(),
                    amounts.len()
                )));
            }
            vec![uints(book_ids), uints(review_ids), uints(amounts)]
        }
    };
    Ok(encode_function(call.signature(), &tokens))
}

pub fn balance_of_calldata(owner: &Address) -> Vec<u8> {
    encode_function("balanceOf(address)", &[Token::Address(*owner)])
}

/// Decode a single `uint256` return value.
pub fn decode_uint(data: &[u8]) -> LedgerResult<U256> {
    if data.len() < WORD {
        return Err(LedgerError::Abi(format!(
            "expected at least {WORD} bytes of return data, got {}",
            data.len()
        )));
    }
    Ok(U256::from_big_endian(&data[..WORD]))
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex(s: &str) -> LedgerResult<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| LedgerError::Abi(format!("invalid hex '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{BookId, LikeAmount, ReviewId};

    fn word(data: &[u8], index: usize) -> &[u8] {
        &data[index * WORD..(index + 1) * WORD]
    }

    #[test]
    fn known_selectors() {
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(
            to_hex(&keccak256(b"Transfer(address,address,uint256)")),
            TRANSFER_TOPIC
        );
    }

    #[test]
    fn static_arguments_fill_the_head() {
        let mut bytes = [0u8; 20];
        bytes[19] = 0x42;
        let data = encode(&[Token::Address(Address::from_bytes(bytes)), Token::Uint(U256::from(7))]);
        assert_eq!(data.len(), 2 * WORD);
        assert_eq!(data[31], 0x42);
        assert!(data[..12].iter().all(|b| *b == 0));
        assert_eq!(data[63], 7);
    }

    #[test]
    fn string_is_offset_and_padded() {
        let data = encode(&[Token::Uint(U256::one()), Token::String("ab".into())]);
        assert_eq!(data.len(), 4 * WORD);
        assert_eq!(U256::from_big_endian(word(&data, 1)), U256::from(0x40));
        assert_eq!(U256::from_big_endian(word(&data, 2)), U256::from(2));
        assert_eq!(&word(&data, 3)[..2], b"ab");
        assert!(word(&data, 3)[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn batch_distribute_layout() {
        let call = LedgerCall::BatchDistribute {
            book_ids: vec![BookId::from(1)],
            review_ids: vec![ReviewId::from(10)],
            amounts: vec![LikeAmount::from(2)],
        };
        let data = calldata(&call).unwrap();
        assert_eq!(&data[..4], &selector(call.signature()));
        let args = &data[4..];
        assert_eq!(args.len(), 9 * WORD);
        assert_eq!(U256::from_big_endian(word(args, 0)), U256::from(96));
        assert_eq!(U256::from_big_endian(word(args, 1)), U256::from(160));
        assert_eq!(U256::from_big_endian(word(args, 2)), U256::from(224));
        assert_eq!(U256::from_big_endian(word(args, 3)), U256::one());
        assert_eq!(U256::from_big_endian(word(args, 6)), U256::from(10));
        assert_eq!(U256::from_big_endian(word(args, 8)), U256::from(2));
    }

    #[test]
    fn mismatched_batch_is_rejected_before_encoding() {
        let call = LedgerCall::BatchDistribute {
            book_ids: vec![BookId::from(1), BookId::from(2)],
            review_ids: vec![ReviewId::from(1)],
            amounts: vec![LikeAmount::from(1)],
        };
        assert!(matches!(calldata(&call), Err(LedgerError::InvalidCall(_))));
    }

    #[test]
    fn decode_uint_return() {
        let data = from_hex(&format!("0x{}", "00".repeat(31) + "2a")).unwrap();
        assert_eq!(decode_uint(&data).unwrap(), U256::from(42));
        assert!(decode_uint(&[0u8; 4]).is_err());
        assert!(from_hex("0xzz").is_err());
    }
}
