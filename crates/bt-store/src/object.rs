use std::fmt;

use bt_crypto::{Hasher, Linked};
use bt_types::{Digest, Timestamp};
use serde::{Deserialize, Serialize};

/// A sealed block.
///
/// A block commits to one batch through `tx_hash` (the batch's Merkle root)
/// and to its predecessor through `prev_hash`. Its identity is never stored;
/// it is recomputed by [`Block::hash`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: Timestamp,
    pub prev_hash: Digest,
    pub tx_hash: Digest,
}

impl Block {
    pub fn new(timestamp: Timestamp, prev_hash: Digest, tx_hash: Digest) -> Self {
        Self {
            timestamp,
            prev_hash,
            tx_hash,
        }
    }

    /// `H(tx_hash ∥ decimal(timestamp_nanos) ∥ prev_hash)`.
    ///
    /// The fields are only read; each one is streamed into the hasher as a
    /// borrowed slice.
    pub fn hash(&self) -> Digest {
        let decimal = self.timestamp.to_decimal();
        Hasher::hash_concat(&[
            self.tx_hash.as_slice(),
            decimal.as_bytes(),
            self.prev_hash.as_slice(),
        ])
    }
}

impl Linked for Block {
    fn link_hash(&self) -> Digest {
        self.hash()
    }

    fn prev_hash(&self) -> Digest {
        self.prev_hash
    }
}

/// Chain-log rendering of a single block.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}", self.hash())?;
        writeln!(f, "Timestamp: \t{}", self.timestamp)?;
        writeln!(f, "TX-Hash: \t{}", self.tx_hash)?;
        write!(f, "Linked Block: \t{}", self.prev_hash)
    }
}
