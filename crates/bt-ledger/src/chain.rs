use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bt_crypto::{HashChainVerifier, Hasher, MerkleItem, MerkleTree};
use bt_store::{Block, LedgerStore};
use bt_types::{Digest, Timestamp, TxId};
use tracing::{debug, info, warn};

use crate::config::ChainConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::status::VerificationStatus;
use crate::traits::{LedgerReader, LedgerWriter};

/// Batching hash-chain ledger over a [`LedgerStore`].
///
/// Committed data is buffered until `batch_size` items are pending, then
/// sealed into a Merkle tree and a block linked to its predecessor. The
/// first block links to a random seed hash drawn at construction.
pub struct Chain<S> {
    store: S,
    config: ChainConfig,
    seed_hash: Digest,
    state: RwLock<ChainState>,
}

#[derive(Default)]
struct ChainState {
    buffer: Vec<MerkleItem>,
    latest_block: Option<Block>,
    last_tick: Option<Timestamp>,
}

impl ChainState {
    fn tick(&mut self) -> Timestamp {
        let now = Timestamp::now_after(self.last_tick);
        self.last_tick = Some(now);
        now
    }
}

impl<S: LedgerStore> Chain<S> {
    /// Start an empty chain anchored to a freshly drawn random seed.
    pub fn genesis(store: S, config: ChainConfig) -> LedgerResult<Self> {
        let chain = Self::with_seed(store, config, Hasher::random_digest()?)?;
        info!(
            seed = %chain.seed_hash,
            batch_size = chain.config.batch_size,
            "chain created"
        );
        Ok(chain)
    }

    /// Start an empty chain anchored to a caller-chosen seed.
    pub fn with_seed(store: S, config: ChainConfig, seed_hash: Digest) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            seed_hash,
            state: RwLock::new(ChainState::default()),
        })
    }

    pub fn seed_hash(&self) -> Digest {
        self.seed_hash
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The most recently sealed block, if any.
    pub fn latest_block(&self) -> LedgerResult<Option<Block>> {
        Ok(self.read_state()?.latest_block.clone())
    }

    /// Ids waiting in the buffer, oldest first.
    pub fn pending(&self) -> LedgerResult<Vec<TxId>> {
        Ok(self
            .read_state()?
            .buffer
            .iter()
            .map(|item| item.id.clone())
            .collect())
    }

    /// The tree sealed into the latest block, if any.
    pub fn latest_tree(&self) -> LedgerResult<Option<Arc<MerkleTree>>> {
        match self.latest_block()? {
            Some(block) => Ok(self.store.get_tree(&block.tx_hash)?),
            None => Ok(None),
        }
    }

    /// Walk sealed blocks newest first.
    ///
    /// The walk starts from a snapshot of the latest block and follows
    /// `prev_hash` links through the store until a lookup comes back empty,
    /// which is always the case for the seed hash.
    pub fn blocks(&self) -> LedgerResult<Blocks<'_, S>> {
        let cursor = match self.latest_block()? {
            Some(block) => Cursor::Block(block),
            None => Cursor::Done,
        };
        Ok(Blocks {
            store: &self.store,
            cursor,
        })
    }

    /// Check the stored chain end to end and return the number of blocks.
    ///
    /// Every block's tree must be stored under its `tx_hash` with a matching
    /// root, every `prev_hash` must equal the recomputed hash of the next
    /// older block, and the oldest block must link to the seed.
    pub fn audit(&self) -> LedgerResult<usize> {
        let mut blocks = Vec::new();
        for block in self.blocks()? {
            let block = block?;
            let tree = self
                .store
                .get_tree(&block.tx_hash)?
                .ok_or(LedgerError::MissingTree {
                    block: block.hash(),
                    tx_hash: block.tx_hash,
                })?;
            if tree.root_hash() != block.tx_hash {
                return Err(LedgerError::TreeMismatch {
                    tx_hash: block.tx_hash,
                    root: tree.root_hash(),
                });
            }
            blocks.push(block);
        }

        HashChainVerifier::verify_links(&blocks, &self.seed_hash)?;
        info!(blocks = blocks.len(), "chain audit passed");
        Ok(blocks.len())
    }

    /// Human-readable dump of the seed, buffer occupancy and every block,
    /// newest first.
    pub fn chain_log(&self) -> LedgerResult<String> {
        let pending = self.read_state()?.buffer.len();
        let blocks = self.blocks()?.collect::<LedgerResult<Vec<_>>>()?;
        let log = ChainLog {
            seed_hash: &self.seed_hash,
            pending,
            batch_size: self.config.batch_size,
            blocks: &blocks,
        };
        Ok(log.to_string())
    }

    fn read_state(&self) -> LedgerResult<RwLockReadGuard<'_, ChainState>> {
        self.state.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write_state(&self) -> LedgerResult<RwLockWriteGuard<'_, ChainState>> {
        self.state.write().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Turn the full buffer into a stored tree and block.
    ///
    /// `state` is left untouched unless both store writes succeed.
    fn seal(&self, state: &mut ChainState) -> LedgerResult<Block> {
        let tree = MerkleTree::build(&state.buffer)?;
        debug!(
            leaves = tree.leaf_count(),
            root = %tree.root_hash(),
            "merkle tree built"
        );
        let tx_hash = self.store.put_tree(tree)?;

        let prev_hash = state
            .latest_block
            .as_ref()
            .map_or(self.seed_hash, Block::hash);
        let block = Block::new(state.tick(), prev_hash, tx_hash);
        let block_hash = self.store.put_block(&block)?;

        state.buffer.clear();
        state.latest_block = Some(block.clone());

        if self.config.log_events {
            info!(
                block = %block_hash,
                tx_hash = %tx_hash,
                prev = %prev_hash,
                "block sealed"
            );
        }
        Ok(block)
    }

    fn find_sealed(
        &self,
        latest: Option<Block>,
        id: &TxId,
        data: &[u8],
    ) -> LedgerResult<VerificationStatus> {
        let blocks = Blocks {
            store: &self.store,
            cursor: latest.map_or(Cursor::Done, Cursor::Block),
        };

        for block in blocks {
            let block = block?;
            let Some(tree) = self.store.get_tree(&block.tx_hash)? else {
                warn!(
                    block = %block.hash(),
                    tx_hash = %block.tx_hash,
                    "tree missing from store; skipping block"
                );
                continue;
            };
            if tree.contains(id) {
                return Ok(if tree.verify(id, data) {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::Invalid
                });
            }
        }

        Ok(VerificationStatus::UnknownTxId)
    }
}

impl<S: LedgerStore> LedgerWriter for Chain<S> {
    fn commit(&self, data: &[u8]) -> LedgerResult<TxId> {
        let id = Hasher::tx_id(data, self.write_state()?.tick());
        // Raw data goes to the store without holding the chain lock.
        self.store.put_data(&id, data)?;

        let mut state = self.write_state()?;
        state.buffer.push(MerkleItem::new(data.to_vec(), id.clone()));

        let sealed = state.buffer.len() == self.config.batch_size;
        if sealed {
            if let Err(e) = self.seal(&mut state) {
                // The commit failed as a whole: the buffer stays below a full batch.
                state.buffer.pop();
                return Err(e);
            }
        }

        if self.config.log_events {
            info!(
                id = %id,
                pending = state.buffer.len(),
                batch_size = self.config.batch_size,
                sealed,
                "data committed"
            );
        }
        Ok(id)
    }
}

impl<S: LedgerStore> LedgerReader for Chain<S> {
    fn retrieve(&self, id: &TxId) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.store.get_data(id)?)
    }

    fn verify(&self, id: &TxId, data: &[u8]) -> LedgerResult<VerificationStatus> {
        let latest = {
            let state = self.read_state()?;
            if let Some(item) = state.buffer.iter().find(|item| item.id == *id) {
                return Ok(if item.data == data {
                    VerificationStatus::InBuffer
                } else {
                    VerificationStatus::InBufferInvalid
                });
            }
            state.latest_block.clone()
        };

        self.find_sealed(latest, id, data)
    }
}

struct ChainLog<'a> {
    seed_hash: &'a Digest,
    pending: usize,
    batch_size: usize,
    blocks: &'a [Block],
}

impl fmt::Display for ChainLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "~~ BlockTrain Chainlog ~~")?;
        writeln!(f, "Seed: {}", self.seed_hash)?;
        writeln!(f, "TX-Buffer: {}/{}", self.pending, self.batch_size)?;
        writeln!(f)?;
        writeln!(f, "Attached blocks:")?;
        writeln!(f)?;
        for block in self.blocks {
            writeln!(f, "{block}")?;
            writeln!(f)?;
        }
        writeln!(f, "{} Blocks in chain", self.blocks.len())?;
        writeln!(f)?;
        writeln!(f, "~~ End of Chainlog ~~")
    }
}

/// Iterator over stored blocks, newest first. See [`Chain::blocks`].
pub struct Blocks<'a, S> {
    store: &'a S,
    cursor: Cursor,
}

enum Cursor {
    Block(Block),
    Hash(Digest),
    Done,
}

impl<S: LedgerStore> Iterator for Blocks<'_, S> {
    type Item = LedgerResult<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Block(block) => block,
            Cursor::Hash(hash) => match self.store.get_block(&hash) {
                Ok(Some(block)) => block,
                Ok(None) => {
                    debug!(hash = %hash, "end of chain");
                    return None;
                }
                Err(e) => return Some(Err(e.into())),
            },
        };

        debug!(block = %block.hash(), "visiting block");
        self.cursor = Cursor::Hash(block.prev_hash);
        Some(Ok(block))
    }
}
