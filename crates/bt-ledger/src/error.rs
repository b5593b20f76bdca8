use bt_crypto::{CryptoError, LinkError, MerkleError};
use bt_store::StoreError;
use bt_types::Digest;

/// Errors produced by ledger operations.
///
/// Verification outcomes are never errors; they are
/// [`VerificationStatus`](crate::VerificationStatus) values.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("chain link error: {0}")]
    Link(#[from] LinkError),

    #[error("block {block} references tree {tx_hash}, which is not in the store")]
    MissingTree { block: Digest, tx_hash: Digest },

    #[error("tree stored under {tx_hash} has root hash {root}")]
    TreeMismatch { tx_hash: Digest, root: Digest },

    #[error("chain state lock poisoned")]
    LockPoisoned,
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
