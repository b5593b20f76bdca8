use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Transaction identifier handed out by a commit.
///
/// A `TxId` is the padded base32 rendering of a 32-byte digest. Ids arriving
/// from users are taken verbatim (`From<&str>`), so an id that never came out
/// of a commit is still a valid lookup key; it just matches nothing.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Derive the id string from its digest.
    pub fn from_digest(digest: &Digest) -> Self {
        Self(digest.to_base32())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as raw bytes, used as hash input.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// First 8 characters, for compact log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.short())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
