//! Cryptographic core of BlockTrain.
//!
//! Provides the single SHA-256 hash primitive, Merkle trees built with an
//! odd-node carry policy and verified by explicit path walks, and hash chain
//! link verification.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod chain;
pub mod hasher;
pub mod merkle;
pub mod path;

pub use chain::{HashChainVerifier, LinkError, Linked};
pub use hasher::{CryptoError, Hasher};
pub use merkle::{MerkleError, MerkleItem, MerkleNode, MerkleTree};
pub use path::{NodePath, Side};
