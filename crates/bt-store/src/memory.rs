use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bt_crypto::MerkleTree;
use bt_types::{Digest, TxId};

use crate::error::{StoreError, StoreResult};
use crate::object::Block;
use crate::traits::LedgerStore;

/// In-memory, HashMap-based ledger store.
///
/// Volatile: everything is lost when the store is dropped. Each key space sits
/// behind its own `RwLock`. Trees are kept as `Arc`s so readers share them
/// without copying.
#[derive(Default)]
pub struct InMemoryStore {
    trees: RwLock<HashMap<Digest, Arc<MerkleTree>>>,
    blocks: RwLock<HashMap<Digest, Block>>,
    data: RwLock<HashMap<TxId, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored trees.
    pub fn tree_count(&self) -> StoreResult<usize> {
        Ok(self
            .trees
            .read()
            .map_err(|_| StoreError::LockPoisoned("tree"))?
            .len())
    }

    /// Number of stored blocks.
    pub fn block_count(&self) -> StoreResult<usize> {
        Ok(self
            .blocks
            .read()
            .map_err(|_| StoreError::LockPoisoned("block"))?
            .len())
    }

    /// Number of stored data entries.
    pub fn data_count(&self) -> StoreResult<usize> {
        Ok(self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("data"))?
            .len())
    }
}

impl LedgerStore for InMemoryStore {
    fn put_tree(&self, tree: MerkleTree) -> StoreResult<Digest> {
        let root_hash = tree.root_hash();
        let mut trees = self
            .trees
            .write()
            .map_err(|_| StoreError::LockPoisoned("tree"))?;
        trees.insert(root_hash, Arc::new(tree));
        Ok(root_hash)
    }

    fn get_tree(&self, root_hash: &Digest) -> StoreResult<Option<Arc<MerkleTree>>> {
        let trees = self
            .trees
            .read()
            .map_err(|_| StoreError::LockPoisoned("tree"))?;
        Ok(trees.get(root_hash).cloned())
    }

    fn put_block(&self, block: &Block) -> StoreResult<Digest> {
        let block_hash = block.hash();
        let mut blocks = self
            .blocks
            .write()
            .map_err(|_| StoreError::LockPoisoned("block"))?;
        blocks.insert(block_hash, block.clone());
        Ok(block_hash)
    }

    fn get_block(&self, block_hash: &Digest) -> StoreResult<Option<Block>> {
        let blocks = self
            .blocks
            .read()
            .map_err(|_| StoreError::LockPoisoned("block"))?;
        Ok(blocks.get(block_hash).cloned())
    }

    fn put_data(&self, id: &TxId, data: &[u8]) -> StoreResult<()> {
        let mut map = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("data"))?;
        map.insert(id.clone(), data.to_vec());
        Ok(())
    }

    fn get_data(&self, id: &TxId) -> StoreResult<Option<Vec<u8>>> {
        let map = self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("data"))?;
        Ok(map.get(id).cloned())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("trees", &self.tree_count().ok())
            .field("blocks", &self.block_count().ok())
            .field("data", &self.data_count().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_crypto::MerkleItem;
    use bt_types::Timestamp;

    fn make_tree(tag: &str) -> MerkleTree {
        let items: Vec<MerkleItem> = (0..4)
            .map(|i| MerkleItem::new(format!("{tag}-{i}").into_bytes(), TxId::from(format!("{tag}{i}"))))
            .collect();
        MerkleTree::build(&items).unwrap()
    }

    fn make_block(seed: u8) -> Block {
        Block::new(
            Timestamp::from_nanos(1_000 + seed as u64),
            Digest::from_hash([seed; 32]),
            Digest::from_hash([seed.wrapping_add(1); 32]),
        )
    }

    #[test]
    fn put_and_get_tree_by_root_hash() {
        let store = InMemoryStore::new();
        let tree = make_tree("a");
        let root = store.put_tree(tree.clone()).unwrap();
        assert_eq!(root, tree.root_hash());

        let fetched = store.get_tree(&root).unwrap().expect("tree stored");
        assert_eq!(*fetched, tree);
        assert_eq!(store.tree_count().unwrap(), 1);
    }

    #[test]
    fn trees_are_shared_not_copied() {
        let store = InMemoryStore::new();
        let root = store.put_tree(make_tree("b")).unwrap();
        let first = store.get_tree(&root).unwrap().unwrap();
        let second = store.get_tree(&root).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn block_roundtrip_preserves_fields() {
        let store = InMemoryStore::new();
        let block = make_block(7);
        let key = store.put_block(&block).unwrap();
        assert_eq!(key, block.hash());

        let fetched = store.get_block(&key).unwrap().expect("block stored");
        assert_eq!(fetched.timestamp, block.timestamp);
        assert_eq!(fetched.prev_hash, block.prev_hash);
        assert_eq!(fetched.tx_hash, block.tx_hash);
    }

    #[test]
    fn data_roundtrip() {
        let store = InMemoryStore::new();
        let id = TxId::from("ID1");
        store.put_data(&id, b"payload").unwrap();
        assert_eq!(store.get_data(&id).unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.data_count().unwrap(), 1);
    }

    #[test]
    fn absent_keys_are_none_not_errors() {
        let store = InMemoryStore::new();
        let key = Digest::from_hash([0xee; 32]);
        assert!(store.get_tree(&key).unwrap().is_none());
        assert!(store.get_block(&key).unwrap().is_none());
        assert!(store.get_data(&TxId::from("missing")).unwrap().is_none());
    }

    #[test]
    fn arc_wrapped_store_delegates() {
        let store = Arc::new(InMemoryStore::new());
        let handle: &dyn LedgerStore = &store;
        let key = handle.put_block(&make_block(3)).unwrap();
        assert!(store.get_block(&key).unwrap().is_some());
        assert_eq!(store.block_count().unwrap(), 1);
    }

    #[test]
    fn debug_reports_counts() {
        let store = InMemoryStore::new();
        store.put_data(&TxId::from("x"), b"1").unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryStore"));
        assert!(debug.contains("data: Some(1)"));
    }
}
