//! Canonical model representations.
//!
//! - [`tree`]: arena binary trees used by the random forest and the boosted
//!   ensemble
//! - [`network`]: dense layers of the feed-forward network

/// Node identifier: an index into a tree's node arena.
pub type NodeId = u32;

pub mod network;
pub mod tree;

pub use network::{Layer, LayerUpdate, Network, OutputActivation};
pub use tree::{ClassLeaf, FeatureRow, LeafValue, MutableTree, Node, ScalarLeaf, Tree, TreeValidationError};
