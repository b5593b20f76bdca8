use bt_types::{Digest, Timestamp, TxId};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest as _, Sha256};

/// The one hash primitive of the ledger (SHA-256).
///
/// Leaf commitments, internal tree nodes, transaction ids and block identity
/// all go through this type. Inputs are concatenations of borrowed slices fed
/// to the hasher in order; nothing is ever appended to a stored buffer.
pub struct Hasher;

impl Hasher {
    /// `H(data)`.
    pub fn hash(data: &[u8]) -> Digest {
        Digest::from_hash(Sha256::digest(data).into())
    }

    /// `H(parts[0] ∥ parts[1] ∥ ...)`.
    pub fn hash_concat(parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Digest::from_hash(hasher.finalize().into())
    }

    /// Leaf commitment `H(data ∥ id)`.
    pub fn leaf(data: &[u8], id: &TxId) -> Digest {
        Self::hash_concat(&[data, id.as_bytes()])
    }

    /// Internal node `H(left ∥ right)`.
    pub fn node(left: &Digest, right: &Digest) -> Digest {
        Self::hash_concat(&[left.as_slice(), right.as_slice()])
    }

    /// Transaction id `base32(H(H(data) ∥ decimal(nanos)))`.
    ///
    /// Salting with the commit time gives identical payloads distinct ids.
    pub fn tx_id(data: &[u8], at: Timestamp) -> TxId {
        let inner = Self::hash(data);
        let decimal = at.to_decimal();
        TxId::from_digest(&Self::hash_concat(&[inner.as_slice(), decimal.as_bytes()]))
    }

    /// Draw a digest from the operating system's secure random source.
    pub fn random_digest() -> Result<Digest, CryptoError> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        Ok(Digest::from_hash(bytes))
    }
}

/// Errors from cryptographic primitives.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("failed to read random bytes: {0}")]
    Entropy(String),
}
