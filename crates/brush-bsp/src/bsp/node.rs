//! BSP tree elements.

use std::sync::Arc;

use crate::{Bounds3, CompileBrush, Contents, PlaneNum};

/// Index of an element inside a [`BspTree`](super::BspTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the element in [`BspTree::elements`](super::BspTree::elements).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which child of a node an element hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSide {
    /// Child 0, in front of the node's plane
    Front = 0,
    /// Child 1, behind the node's plane
    Back = 1,
}

impl ChildSide {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// An interior node: a splitting plane and its two subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub plane_num: PlaneNum,
    /// Always `[front, back]`.
    pub children: [NodeRef; 2],
    /// Covers every brush below this node.
    pub bounds: Bounds3,
}

impl TreeNode {
    #[inline]
    pub fn front(&self) -> NodeRef {
        self.children[ChildSide::Front.index()]
    }

    #[inline]
    pub fn back(&self) -> NodeRef {
        self.children[ChildSide::Back.index()]
    }

    #[inline]
    pub fn child(&self, side: ChildSide) -> NodeRef {
        self.children[side.index()]
    }
}

/// A terminal region of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLeaf {
    /// Combined contents of the brushes in the leaf, empty for void.
    pub contents: Contents,
    /// Brushes (or brush fragments) occupying the leaf.
    pub brushes: Vec<Arc<CompileBrush>>,
    pub bounds: Bounds3,
}

impl TreeLeaf {
    /// An empty (void) leaf.
    pub fn empty() -> Self {
        Self {
            contents: Contents::EMPTY,
            brushes: Vec::new(),
            bounds: Bounds3::empty(),
        }
    }

    /// A leaf holding `brushes`, with contents and bounds combined from them.
    pub fn from_brushes(brushes: Vec<Arc<CompileBrush>>) -> Self {
        Self {
            contents: Contents::combine(brushes.iter().map(|b| b.contents())),
            bounds: union_bounds(&brushes),
            brushes,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// A node or a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeElement {
    Node(TreeNode),
    Leaf(TreeLeaf),
}

impl TreeElement {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[inline]
    pub fn as_node(&self) -> Option<&TreeNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Leaf(_) => None,
        }
    }

    #[inline]
    pub fn as_leaf(&self) -> Option<&TreeLeaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Node(_) => None,
        }
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds3 {
        match self {
            Self::Node(node) => &node.bounds,
            Self::Leaf(leaf) => &leaf.bounds,
        }
    }
}

/// Union of the bounds of all `brushes`.
pub(crate) fn union_bounds(brushes: &[Arc<CompileBrush>]) -> Bounds3 {
    brushes
        .iter()
        .fold(Bounds3::empty(), |acc, b| acc.union(b.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{cube, solid_box};
    use crate::PlaneSet;
    use nalgebra::Point3;

    #[test]
    fn empty_leaf_is_void() {
        let leaf = TreeLeaf::empty();
        assert!(leaf.is_empty());
        assert!(leaf.brushes.is_empty());
        assert!(leaf.bounds.is_empty());
    }

    #[test]
    fn leaf_from_brushes_combines_contents_and_bounds() {
        let mut planes = PlaneSet::new();
        let a = cube(&mut planes, 0, [-100.0, 0.0, 0.0], 64.0);
        let b = solid_box(&mut planes, 1, [100.0, 0.0, 0.0], [64.0; 3], Contents::WATER);

        let leaf = TreeLeaf::from_brushes(vec![a, b]);
        assert_eq!(leaf.contents, Contents::SOLID | Contents::WATER);
        assert_eq!(leaf.bounds.mins, Point3::new(-132.0, -32.0, -32.0));
        assert_eq!(leaf.bounds.maxs, Point3::new(132.0, 32.0, 32.0));
    }

    #[test]
    fn node_children_are_front_then_back() {
        let node = TreeNode {
            plane_num: 0,
            children: [NodeRef::new(1), NodeRef::new(2)],
            bounds: Bounds3::empty(),
        };
        assert_eq!(node.front(), NodeRef::new(1));
        assert_eq!(node.back(), NodeRef::new(2));
        assert_eq!(node.child(ChildSide::Back), node.back());
    }

    #[test]
    fn element_accessors() {
        let leaf = TreeElement::Leaf(TreeLeaf::empty());
        assert!(leaf.is_leaf());
        assert!(leaf.as_node().is_none());
        assert!(leaf.as_leaf().is_some());
    }
}
