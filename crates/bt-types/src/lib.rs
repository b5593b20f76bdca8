//! Foundation types for BlockTrain.
//!
//! Every other BlockTrain crate depends on `bt-types`.
//!
//! # Key Types
//!
//! - [`Digest`]: 32-byte hash used for tree nodes, blocks and the seed
//! - [`TxId`]: base32 transaction identifier returned by a commit
//! - [`Timestamp`]: nanosecond wall-clock instant

pub mod digest;
pub mod temporal;
pub mod txid;

pub use digest::Digest;
pub use temporal::Timestamp;
pub use txid::TxId;
