use bt_types::Digest;

/// Trait for records that participate in a hash chain.
pub trait Linked {
    /// The record's own hash, recomputed from its contents.
    fn link_hash(&self) -> Digest;
    /// The hash of the record this one links back to.
    fn prev_hash(&self) -> Digest;
}

/// Hash chain integrity verifier.
///
/// Verifies that a run of records, newest first, forms an unbroken chain
/// ending at a trusted seed: each record's `prev_hash` equals the recomputed
/// hash of the next-older record, and the oldest record links to the seed.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify `records` (newest first) against `seed`.
    ///
    /// An empty run is trivially valid.
    pub fn verify_links(records: &[impl Linked], seed: &Digest) -> Result<(), LinkError> {
        for (index, pair) in records.windows(2).enumerate() {
            if pair[0].prev_hash() != pair[1].link_hash() {
                return Err(LinkError::BrokenLink { index });
            }
        }

        match records.last() {
            Some(oldest) if oldest.prev_hash() != *seed => Err(LinkError::UnanchoredTail {
                index: records.len() - 1,
            }),
            _ => Ok(()),
        }
    }
}

/// Errors from chain verification. Indices count from the newest record.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("broken link at index {index}: prev_hash does not match the next-older record")]
    BrokenLink { index: usize },

    #[error("oldest record at index {index} does not link to the seed")]
    UnanchoredTail { index: usize },
}
