use bt_types::TxId;
use serde::{Deserialize, Serialize};

use crate::merkle::MerkleNode;

/// Which child of a branch a path descends into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug)]
struct Frame<'a> {
    node: &'a MerkleNode,
    /// The child currently being explored, `None` until the first descent.
    descended: Option<Side>,
}

/// Root-to-leaf path through a borrowed tree.
///
/// Built by an explicit-stack depth-first search. All traversal state lives
/// in the stack itself, so any number of callers may search the same tree at
/// once without touching it.
#[derive(Clone, Debug)]
pub struct NodePath<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> NodePath<'a> {
    /// Find the path from `root` to the leaf bound to `id`.
    ///
    /// Returns `None` if no leaf carries that id. Leaves are explored left to
    /// right, so with duplicate ids the leftmost wins.
    pub fn find(root: &'a MerkleNode, id: &TxId) -> Option<Self> {
        let mut frames = vec![Frame {
            node: root,
            descended: None,
        }];

        while let Some(top) = frames.last_mut() {
            let node = top.node;
            match node {
                MerkleNode::Leaf { id: leaf_id, .. } => {
                    if leaf_id == id {
                        return Some(Self { frames });
                    }
                    frames.pop();
                }
                MerkleNode::Branch { left, right, .. } => {
                    let next = match top.descended {
                        None => Some((Side::Left, left.as_ref())),
                        Some(Side::Left) => Some((Side::Right, right.as_ref())),
                        Some(Side::Right) => None,
                    };
                    match next {
                        Some((side, child)) => {
                            top.descended = Some(side);
                            frames.push(Frame {
                                node: child,
                                descended: None,
                            });
                        }
                        None => {
                            frames.pop();
                        }
                    }
                }
            }
        }

        None
    }

    /// The leaf at the bottom of the path.
    pub fn leaf(&self) -> &'a MerkleNode {
        // `find` only ever returns a non-empty path.
        self.frames[self.frames.len() - 1].node
    }

    /// Ancestors of the leaf from its parent up to the root, each with the
    /// side the path took below it.
    pub fn ancestors(&self) -> impl Iterator<Item = (&'a MerkleNode, Side)> + '_ {
        let above_leaf = self.frames.len().saturating_sub(1);
        self.frames[..above_leaf]
            .iter()
            .rev()
            .filter_map(|frame| frame.descended.map(|side| (frame.node, side)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::{MerkleItem, MerkleTree};

    fn tree(n: usize) -> MerkleTree {
        let items: Vec<MerkleItem> = (0..n)
            .map(|i| MerkleItem::new(vec![i as u8], TxId::from(format!("tx-{i}"))))
            .collect();
        MerkleTree::build(&items).unwrap()
    }

    #[test]
    fn finds_every_leaf_of_a_balanced_tree() {
        let tree = tree(8);
        for i in 0..8 {
            let id = TxId::from(format!("tx-{i}"));
            let path = NodePath::find(tree.root(), &id).expect("leaf present");
            assert!(matches!(path.leaf(), MerkleNode::Leaf { id: leaf_id, .. } if *leaf_id == id));
            assert_eq!(path.ancestors().count(), 3);
        }
    }

    #[test]
    fn sides_follow_leaf_position() {
        let tree = tree(4);
        let path = NodePath::find(tree.root(), &TxId::from("tx-2")).unwrap();
        let sides: Vec<Side> = path.ancestors().map(|(_, side)| side).collect();
        // Parent is the right pair, where tx-2 is the left child; the root
        // descended right.
        assert_eq!(sides, vec![Side::Left, Side::Right]);
    }

    #[test]
    fn carried_leaf_sits_higher() {
        // Five leaves: the fifth is carried twice and joins at the root.
        let tree = tree(5);
        let path = NodePath::find(tree.root(), &TxId::from("tx-4")).unwrap();
        assert_eq!(path.ancestors().count(), 1);
        let path = NodePath::find(tree.root(), &TxId::from("tx-0")).unwrap();
        assert_eq!(path.ancestors().count(), 3);
    }

    #[test]
    fn missing_id_yields_none() {
        let tree = tree(4);
        assert!(NodePath::find(tree.root(), &TxId::from("nope")).is_none());
        assert!(NodePath::find(tree.root(), &TxId::from("")).is_none());
    }

    #[test]
    fn search_leaves_tree_untouched() {
        let tree = tree(6);
        let before = tree.clone();
        let _ = NodePath::find(tree.root(), &TxId::from("tx-5"));
        let _ = NodePath::find(tree.root(), &TxId::from("absent"));
        assert_eq!(tree, before);
    }
}
