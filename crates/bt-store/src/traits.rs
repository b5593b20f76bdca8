use std::sync::Arc;

use bt_crypto::MerkleTree;
use bt_types::{Digest, TxId};

use crate::error::StoreResult;
use crate::object::Block;

/// Persistence boundary of the ledger.
///
/// Three key spaces: trees by root hash, blocks by block hash, raw data by
/// transaction id. All implementations must satisfy these invariants:
/// - A lookup for an absent key returns `Ok(None)`, never an error.
/// - A read after a write in the same process observes the write.
/// - Backend failures are propagated as `Err`, never silently ignored.
///
/// Nothing else is assumed: no ordering, durability or latency guarantees.
/// Retry policy, if any, belongs to the implementation.
pub trait LedgerStore: Send + Sync {
    /// Store a tree under its root hash and return that hash.
    fn put_tree(&self, tree: MerkleTree) -> StoreResult<Digest>;

    /// Fetch a tree by root hash.
    ///
    /// Trees are immutable once stored and handed out shared.
    fn get_tree(&self, root_hash: &Digest) -> StoreResult<Option<Arc<MerkleTree>>>;

    /// Store a block under its computed hash and return that hash.
    fn put_block(&self, block: &Block) -> StoreResult<Digest>;

    /// Fetch a block by block hash.
    fn get_block(&self, block_hash: &Digest) -> StoreResult<Option<Block>>;

    /// Store raw committed data under its transaction id.
    fn put_data(&self, id: &TxId, data: &[u8]) -> StoreResult<()>;

    /// Fetch raw committed data by transaction id.
    fn get_data(&self, id: &TxId) -> StoreResult<Option<Vec<u8>>>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    fn put_tree(&self, tree: MerkleTree) -> StoreResult<Digest> {
        (**self).put_tree(tree)
    }

    fn get_tree(&self, root_hash: &Digest) -> StoreResult<Option<Arc<MerkleTree>>> {
        (**self).get_tree(root_hash)
    }

    fn put_block(&self, block: &Block) -> StoreResult<Digest> {
        (**self).put_block(block)
    }

    fn get_block(&self, block_hash: &Digest) -> StoreResult<Option<Block>> {
        (**self).get_block(block_hash)
    }

    fn put_data(&self, id: &TxId, data: &[u8]) -> StoreResult<()> {
        (**self).put_data(id, data)
    }

    fn get_data(&self, id: &TxId) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_data(id)
    }
}
