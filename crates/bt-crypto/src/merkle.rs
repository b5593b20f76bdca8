use std::fmt;

use bt_types::{Digest, TxId};
use serde::{Deserialize, Serialize};

use crate::hasher::Hasher;
use crate::path::{NodePath, Side};

/// One `(data, id)` pair committed to a tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleItem {
    pub data: Vec<u8>,
    pub id: TxId,
}

impl MerkleItem {
    pub fn new(data: Vec<u8>, id: TxId) -> Self {
        Self { data, id }
    }
}

/// A node of a binary hash tree.
///
/// Branches own their children outright. A node carried past an odd level is
/// moved into the next level, so no node ever has two parents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerkleNode {
    Leaf {
        hash: Digest,
        id: TxId,
    },
    Branch {
        hash: Digest,
        left: Box<MerkleNode>,
        right: Box<MerkleNode>,
    },
}

impl MerkleNode {
    /// Leaf committing to `H(data ∥ id)`.
    pub fn leaf(data: &[u8], id: TxId) -> Self {
        Self::Leaf {
            hash: Hasher::leaf(data, &id),
            id,
        }
    }

    /// Branch over two subtrees, hashed as `H(left ∥ right)`.
    pub fn branch(left: MerkleNode, right: MerkleNode) -> Self {
        Self::Branch {
            hash: Hasher::node(left.hash(), right.hash()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The stored hash of this node.
    pub fn hash(&self) -> &Digest {
        match self {
            Self::Leaf { hash, .. } | Self::Branch { hash, .. } => hash,
        }
    }

    /// Whether any leaf in this subtree is bound to `id`.
    pub fn contains(&self, id: &TxId) -> bool {
        match self {
            Self::Leaf { id: leaf_id, .. } => leaf_id == id,
            Self::Branch { left, right, .. } => left.contains(id) || right.contains(id),
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Indented dump of this subtree. Children sit two spaces deeper than
    /// their parent; leaves show their id.
    pub fn render(&self) -> String {
        Rendered { node: self, depth: 0 }.to_string()
    }
}

struct Rendered<'a> {
    node: &'a MerkleNode,
    depth: usize,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth);
        match self.node {
            MerkleNode::Leaf { hash, id } => writeln!(f, "{indent}{hash} ({id})"),
            MerkleNode::Branch { hash, left, right } => {
                writeln!(f, "{indent}{hash}")?;
                for child in [left, right] {
                    let child = Rendered {
                        node: child,
                        depth: self.depth + 1,
                    };
                    write!(f, "{child}")?;
                }
                Ok(())
            }
        }
    }
}

/// Merkle tree over one sealed batch.
///
/// Construction pairs nodes level by level. When a level has an odd count
/// the last node is carried up unchanged and paired in a later round, so a
/// trailing item may sit closer to the root than its siblings. No padding
/// nodes are invented.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    root: MerkleNode,
}

impl MerkleTree {
    /// Smallest batch a tree can be built from.
    pub const MIN_BATCH: usize = 2;

    /// Build a tree over `items` in order.
    ///
    /// Fewer than two items cannot form a root with children and are
    /// rejected with [`MerkleError::InvalidBatch`].
    pub fn build(items: &[MerkleItem]) -> Result<Self, MerkleError> {
        if items.len() < Self::MIN_BATCH {
            return Err(MerkleError::InvalidBatch { size: items.len() });
        }

        let mut level: Vec<MerkleNode> = items
            .iter()
            .map(|item| MerkleNode::leaf(&item.data, item.id.clone()))
            .collect();

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len() / 2 + 1);
            let mut nodes = level.into_iter();
            while let Some(left) = nodes.next() {
                match nodes.next() {
                    Some(right) => next.push(MerkleNode::branch(left, right)),
                    // Odd carry: the unpaired node moves up as is.
                    None => next.push(left),
                }
            }
            level = next;
        }

        let root = level
            .pop()
            .ok_or(MerkleError::InvalidBatch { size: items.len() })?;
        Self::from_root(root)
    }

    /// Adopt an existing root, recomputing its hash from its children.
    ///
    /// Any hash already stored on the root is ignored.
    pub fn from_root(root: MerkleNode) -> Result<Self, MerkleError> {
        match root {
            MerkleNode::Branch { left, right, .. } => Ok(Self {
                root: MerkleNode::Branch {
                    hash: Hasher::node(left.hash(), right.hash()),
                    left,
                    right,
                },
            }),
            MerkleNode::Leaf { .. } => Err(MerkleError::InvalidBatch { size: 1 }),
        }
    }

    /// The root hash committing to the whole batch.
    pub fn root_hash(&self) -> Digest {
        *self.root.hash()
    }

    pub fn root(&self) -> &MerkleNode {
        &self.root
    }

    /// Number of items in the batch.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Whether the tree holds a leaf bound to `id`.
    pub fn contains(&self, id: &TxId) -> bool {
        self.root.contains(id)
    }

    /// Check that `data` is what was committed under `id`.
    ///
    /// Locates the leaf, compares its stored hash against `H(data ∥ id)`,
    /// then walks back to the root recomputing every ancestor from its
    /// children. Any disagreement, or a missing leaf, yields `false`.
    pub fn verify(&self, id: &TxId, data: &[u8]) -> bool {
        let Some(path) = NodePath::find(&self.root, id) else {
            return false;
        };

        let expected = Hasher::leaf(data, id);
        if *path.leaf().hash() != expected {
            return false;
        }

        let mut current = expected;
        for (ancestor, side) in path.ancestors() {
            let MerkleNode::Branch { hash, left, right } = ancestor else {
                return false;
            };
            let recomputed = match side {
                Side::Left => Hasher::node(&current, right.hash()),
                Side::Right => Hasher::node(left.hash(), &current),
            };
            if recomputed != *hash {
                return false;
            }
            current = recomputed;
        }

        true
    }

    /// Indented dump of the tree, one node per line, root first.
    pub fn render(&self) -> String {
        self.root.render()
    }
}

/// Errors from tree construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("invalid batch of {size} item(s): a tree needs at least two")]
    InvalidBatch { size: usize },
}
