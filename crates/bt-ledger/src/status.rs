use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of verifying a transaction id against candidate data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Committed, not yet sealed, data matches.
    InBuffer,
    /// Committed, not yet sealed, data differs from what was recorded.
    InBufferInvalid,
    /// Sealed, path-verified, data matches.
    Verified,
    /// Sealed and found, but the hash-path check failed.
    Invalid,
    /// The id is not pending and no sealed block contains it.
    UnknownTxId,
}

impl VerificationStatus {
    /// Human-readable description shown by the shell.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InBuffer => "In buffer (not yet in a block)",
            Self::InBufferInvalid => {
                "In buffer (not yet in a block) / Invalid (data-txID mismatch)"
            }
            Self::Verified => "Verified",
            Self::Invalid => "Invalid",
            Self::UnknownTxId => "Unknown transaction ID",
        }
    }

    /// The data matched what was committed.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::InBuffer | Self::Verified)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
