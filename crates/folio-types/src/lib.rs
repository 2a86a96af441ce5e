//! Foundation types for Folio.
//!
//! Every other Folio crate depends on `folio-types`.
//!
//! # Key Types
//!
//! - [`BookId`], [`ReviewId`], [`LikeAmount`] -- 256-bit on-chain integers
//! - [`Address`] -- EVM account
//! - [`ContentId`] -- content store identifier, with `ipfs://` URI handling
//! - [`BookMetadata`], [`ReviewMetadata`] -- off-chain JSON documents

pub mod address;
pub mod cid;
pub mod error;
pub mod id;
pub mod metadata;

pub use address::Address;
pub use cid::{ContentId, IPFS_SCHEME};
pub use error::TypeError;
pub use id::{BookId, LikeAmount, ReviewId};
pub use metadata::{excerpt, BookMetadata, ReviewMetadata};
pub use primitive_types::U256;
