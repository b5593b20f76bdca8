use std::fmt;

use data_encoding::BASE32;
use serde::{Deserialize, Serialize};

/// A 32-byte hash digest.
///
/// Used for leaf and node hashes of Merkle trees, for block identity and block
/// linkage, and for the chain's seed hash. `Digest` never hashes anything
/// itself; the hash primitive lives in `bt-crypto`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Standard base32 (RFC 4648, padded), the form shown in chain logs.
    pub fn to_base32(&self) -> String {
        BASE32.encode(&self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_rendering() {
        let digest = Digest::from_hash([0xab; 32]);
        assert_eq!(digest.short_hex(), "abababab");
        assert_eq!(format!("{digest:?}"), "Digest(abababab)");
    }

    #[test]
    fn base32_is_padded_standard_alphabet() {
        let digest = Digest::from_hash([0; 32]);
        let encoded = digest.to_base32();
        assert_eq!(encoded.len(), 56);
        assert!(encoded.ends_with("===="));
        assert!(encoded.starts_with("AAAA"));
        assert_eq!(
            Digest::from_hash([0xff; 32]).to_base32(),
            format!("{}Q====", "7".repeat(51))
        );
    }

    #[test]
    fn display_is_base32() {
        let digest = Digest::from_hash([7; 32]);
        assert_eq!(format!("{digest}"), digest.to_base32());
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(Digest::from_hash([9; 32]).short_hex().len(), 8);
    }

    #[test]
    fn serde_roundtrip() {
        let digest = Digest::from_hash([42; 32]);
        let json = serde_json::to_string(&digest).unwrap();
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, parsed);
    }
}
