//! Binary Space Partitioning of convex brushes.
//!
//! This module turns a list of compiled brushes into a BSP tree whose leaves
//! are either empty space or regions filled by brushes, then flattens that
//! tree into the arrays a BSP file stores:
//!
//! - Splitting planes are chosen from brush sides so that brushes are cut as
//!   rarely as possible and the two sides stay balanced
//! - A lone brush is still carved out of the surrounding void, one boundary
//!   plane at a time
//! - Flattened nodes and leaves are numbered front subtree first
//!
//! # Example
//!
//! ```ignore
//! use brush_bsp::{build_tree, flatten_tree, CompileBrush, FaceMap, PlaneSet};
//!
//! let mut planes = PlaneSet::new();
//! let brushes = map_brushes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, b)| CompileBrush::from_map_brush(b, i, &mut planes).map(Arc::new))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let tree = build_tree(brushes, &planes);
//! let faces = FaceMap::new();
//! let flat = flatten_tree(&tree, &faces);
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: arena of [`TreeElement`]s addressed by [`NodeRef`]
//! - [`SplitSelector`]: strategy trait for choosing splitting planes
//! - [`partition_brushes`]: distributes and cuts brushes by a plane
//! - [`TreeBuilder`]: worklist-driven construction
//! - [`TreeVisitor`]: preorder traversal, front before back
//! - [`flatten_tree`]: node/leaf/face arrays for serialization

mod flatten;
mod node;
mod partition;
mod selector;
mod tree;
mod visitor;

pub use flatten::{
    decode_child, encode_leaf, flatten_tree, ChildRef, FlatLeaf, FlatNode, FlattenedTree,
};
pub use node::{ChildSide, NodeRef, TreeElement, TreeLeaf, TreeNode};
pub use partition::{partition_brushes, partition_brushes_with_epsilon, split_brush, Partition};
pub use selector::{select_split_plane, ScoredSelector, SplitCandidate, SplitSelector, UsedPlanes};
pub use tree::{build_tree, BspTree, BuildStats, TreeBuilder};
pub use visitor::{CollectingVisitor, FnVisitor, TreeVisitor, Visit};
