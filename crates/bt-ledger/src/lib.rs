//! Batching hash-chain ledger for BlockTrain.
//!
//! This crate ties the stack together. It provides:
//! - `Chain`, which buffers committed data, seals full batches into Merkle
//!   trees and hash-linked blocks, and verifies ids against candidate data
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `ChainConfig`, loaded from TOML
//! - Whole-chain auditing against the seed hash

pub mod chain;
pub mod config;
pub mod error;
pub mod status;
pub mod traits;

pub use chain::{Blocks, Chain};
pub use config::ChainConfig;
pub use error::{LedgerError, LedgerResult};
pub use status::VerificationStatus;
pub use traits::{LedgerReader, LedgerWriter};
