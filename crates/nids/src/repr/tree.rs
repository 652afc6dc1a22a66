//! Arena-stored binary decision tree shared by both tree ensembles.
//!
//! This module provides:
//! - [`Tree`]: Immutable tree storage with `u32` child references
//! - [`MutableTree`]: Slot-based builder used while growing
//! - [`TreeValidationError`]: Structural validation errors
//!
//! Routing rule: a sample goes left iff `x[feature] <= threshold`.

use std::fmt::Debug;

use ndarray::ArrayView1;

use super::NodeId;

// ============================================================================
// Feature access
// ============================================================================

/// Random access to one sample's feature values.
pub trait FeatureRow {
    fn feature(&self, index: usize) -> f64;
}

impl FeatureRow for [f64] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

impl<const N: usize> FeatureRow for [f64; N] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

impl FeatureRow for Vec<f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

impl FeatureRow for ArrayView1<'_, f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

// ============================================================================
// Leaf values
// ============================================================================

/// Value stored in a terminal node.
pub trait LeafValue: Clone + Debug + PartialEq + Send + Sync {}

/// Class label leaf (random forest trees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassLeaf(pub u32);

/// Additive score leaf (boosted trees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarLeaf(pub f64);

impl LeafValue for ClassLeaf {}
impl LeafValue for ScalarLeaf {}

// ============================================================================
// Node
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node<L> {
    Leaf(L),
    Split {
        feature: u32,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
}

impl<L> Node<L> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,
    #[error("node {node} has {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    #[error("node {node} references itself")]
    SelfLoop { node: NodeId },
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    #[error("node {node} was allocated but never finalized")]
    UnfinishedNode { node: NodeId },
}

// ============================================================================
// Tree
// ============================================================================

/// Immutable binary tree. Node `0` is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<L: LeafValue> {
    nodes: Vec<Node<L>>,
}

impl<L: LeafValue> Tree<L> {
    /// Tree consisting of a single leaf.
    pub fn leaf(value: L) -> Self {
        Self {
            nodes: vec![Node::Leaf(value)],
        }
    }

    /// Build from raw nodes, checking structure.
    pub fn from_nodes(nodes: Vec<Node<L>>) -> Result<Self, TreeValidationError> {
        let tree = Self { nodes };
        tree.validate()?;
        Ok(tree)
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[Node<L>] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of levels; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0 as NodeId, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = self.node(id) {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }

    /// Walk from the root to the leaf reached by `features`.
    #[inline]
    pub fn traverse_to_leaf<R: FeatureRow + ?Sized>(&self, features: &R) -> NodeId {
        let mut id: NodeId = 0;
        while let Node::Split {
            feature,
            threshold,
            left,
            right,
        } = self.node(id)
        {
            id = if features.feature(*feature as usize) <= *threshold {
                *left
            } else {
                *right
            };
        }
        id
    }

    /// Leaf value for a single sample.
    #[inline]
    pub fn predict_row<R: FeatureRow + ?Sized>(&self, features: &R) -> &L {
        match self.node(self.traverse_to_leaf(features)) {
            Node::Leaf(value) => value,
            // traverse_to_leaf only stops at leaves
            Node::Split { .. } => unreachable!("traversal ended on a split node"),
        }
    }

    /// Check that the nodes form a tree rooted at `0`.
    ///
    /// Every child reference must be in bounds, no node may be reached twice,
    /// and every node must be reachable from the root.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            if let Node::Split { left, right, .. } = self.node(node) {
                for (side, child) in [("left", *left), ("right", *right)] {
                    if child == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    if child as usize >= n_nodes {
                        return Err(TreeValidationError::ChildOutOfBounds {
                            node,
                            side,
                            child,
                            n_nodes,
                        });
                    }
                }
                stack.push(*right);
                stack.push(*left);
            }
        }

        match visited.iter().position(|&v| !v) {
            Some(i) => Err(TreeValidationError::UnreachableNode { node: i as NodeId }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// MutableTree
// ============================================================================

/// Tree under construction.
///
/// Nodes are allocated as empty slots and finalized exactly once, either as a
/// leaf or as a split (which allocates both children).
#[derive(Debug, Clone)]
pub struct MutableTree<L: LeafValue> {
    slots: Vec<Option<Node<L>>>,
}

impl<L: LeafValue> Default for MutableTree<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LeafValue> MutableTree<L> {
    /// Builder with an unfinished root slot.
    pub fn new() -> Self {
        Self { slots: vec![None] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn make_leaf(&mut self, node: NodeId, value: L) {
        self.slots[node as usize] = Some(Node::Leaf(value));
    }

    /// Turn `node` into a split and return the fresh `(left, right)` slots.
    pub fn set_split(&mut self, node: NodeId, feature: usize, threshold: f64) -> (NodeId, NodeId) {
        let left = self.slots.len() as NodeId;
        let right = left + 1;
        self.slots.push(None);
        self.slots.push(None);
        self.slots[node as usize] = Some(Node::Split {
            feature: feature as u32,
            threshold,
            left,
            right,
        });
        (left, right)
    }

    /// Finish construction, validating structure.
    pub fn freeze(self) -> Result<Tree<L>, TreeValidationError> {
        let nodes = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or(TreeValidationError::UnfinishedNode { node: i as NodeId }))
            .collect::<Result<Vec<_>, _>>()?;
        Tree::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x0 <= 0.5 ? (x1 <= 2.0 ? 10 : 20) : 30
    fn sample_tree() -> Tree<ClassLeaf> {
        let mut builder = MutableTree::new();
        let (left, right) = builder.set_split(builder.root(), 0, 0.5);
        let (ll, lr) = builder.set_split(left, 1, 2.0);
        builder.make_leaf(ll, ClassLeaf(10));
        builder.make_leaf(lr, ClassLeaf(20));
        builder.make_leaf(right, ClassLeaf(30));
        builder.freeze().unwrap()
    }

    #[test]
    fn predict_routes_ties_left() {
        let tree = sample_tree();
        assert_eq!(tree.predict_row(&[0.5, 2.0]), &ClassLeaf(10));
        assert_eq!(tree.predict_row(&[0.0, 2.1]), &ClassLeaf(20));
        assert_eq!(tree.predict_row(&[0.6, 0.0]), &ClassLeaf(30));
    }

    #[test]
    fn shape_queries() {
        let tree = sample_tree();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 3);
        assert_eq!(Tree::leaf(ScalarLeaf(1.0)).depth(), 1);
    }

    #[test]
    fn freeze_rejects_unfinished_slot() {
        let mut builder = MutableTree::<ScalarLeaf>::new();
        let (left, _right) = builder.set_split(0, 0, 1.0);
        builder.make_leaf(left, ScalarLeaf(0.0));
        assert_eq!(
            builder.freeze().unwrap_err(),
            TreeValidationError::UnfinishedNode { node: 2 }
        );
    }

    #[test]
    fn validate_detects_bad_structure() {
        let leaf = || Node::Leaf(ClassLeaf(0));
        let split = |left, right| Node::Split {
            feature: 0,
            threshold: 0.0,
            left,
            right,
        };

        assert_eq!(
            Tree::<ClassLeaf>::from_nodes(vec![]).unwrap_err(),
            TreeValidationError::EmptyTree
        );
        assert_eq!(
            Tree::from_nodes(vec![split(0, 1), leaf()]).unwrap_err(),
            TreeValidationError::SelfLoop { node: 0 }
        );
        assert!(matches!(
            Tree::from_nodes(vec![split(1, 5), leaf()]).unwrap_err(),
            TreeValidationError::ChildOutOfBounds { side: "right", .. }
        ));
        assert_eq!(
            Tree::from_nodes(vec![split(1, 1), leaf()]).unwrap_err(),
            TreeValidationError::DuplicateVisit { node: 1 }
        );
        assert_eq!(
            Tree::from_nodes(vec![leaf(), leaf()]).unwrap_err(),
            TreeValidationError::UnreachableNode { node: 1 }
        );
    }
}
