//! Ledger storage for BlockTrain.
//!
//! The chain persists three kinds of records, each in its own key space:
//!
//! - [`Block`] -- sealed blocks, keyed by block hash
//! - `MerkleTree` -- one tree per sealed batch, keyed by root hash
//! - raw committed data, keyed by transaction id
//!
//! # Storage Backends
//!
//! All backends implement the [`LedgerStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based volatile store
//!
//! # Design Rules
//!
//! 1. Records are immutable once written.
//! 2. Absent keys are reported as `None`, never as errors.
//! 3. Concurrent reads are always safe.
//! 4. The store never interprets data payloads.
//! 5. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use object::Block;
pub use traits::LedgerStore;
