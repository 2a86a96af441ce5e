//! Content store clients for Folio.
//!
//! Book and review metadata documents, and book cover images, live off chain
//! in an IPFS-style content store. This crate treats that store as an opaque
//! key-value service: put a blob, get back a [`ContentId`]; get a blob by id.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`InMemoryContentStore`] -- content-addressed `HashMap` store for tests,
//!   demos and the local gateway
//! - [`GatewayContentStore`] -- HTTP gateway for reads, pinning API for writes
//!
//! [`ContentStoreExt`] adds typed document helpers to every backend.
//!
//! [`ContentId`]: folio_types::ContentId

pub mod error;
pub mod gateway;
pub mod memory;
pub mod traits;

pub use error::{ContentError, ContentResult};
pub use gateway::{extract_cid, GatewayContentStore};
pub use memory::{content_id_for, InMemoryContentStore};
pub use traits::{ContentStore, ContentStoreExt};
