use bt_types::TxId;

use crate::error::LedgerResult;
use crate::status::VerificationStatus;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Record `data` and return its freshly generated transaction id.
    ///
    /// The data is persisted before this returns, whether or not the commit
    /// completes a batch.
    fn commit(&self, data: &[u8]) -> LedgerResult<TxId>;
}

/// Read boundary for ledger lookup and verification.
pub trait LedgerReader: Send + Sync {
    /// The raw data committed under `id`, if any.
    fn retrieve(&self, id: &TxId) -> LedgerResult<Option<Vec<u8>>>;

    /// Check `data` against what was committed under `id`.
    fn verify(&self, id: &TxId, data: &[u8]) -> LedgerResult<VerificationStatus>;
}
