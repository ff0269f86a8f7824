//! Visitor pattern for BSP tree traversal.
//!
//! [`BspTree::traverse`](super::BspTree::traverse) walks the tree in
//! preorder, front child before back child, and hands each element to a
//! visitor together with its position in the tree.

use super::node::{ChildSide, NodeRef, TreeElement};

/// One element reached during traversal.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node_ref: NodeRef,
    pub element: &'a TreeElement,
    /// The parent node and which of its children this element is.
    pub parent: Option<(NodeRef, ChildSide)>,
    /// Number of nodes above this element.
    pub depth: usize,
}

/// Visitor for processing tree elements during traversal.
///
/// Parents are always visited before their children, and a node's whole
/// front subtree is visited before its back child.
pub trait TreeVisitor {
    fn visit(&mut self, visit: Visit<'_>);
}

/// A visitor that records element references in visit order.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<NodeRef>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected element references in visit order.
    pub fn refs(&self) -> &[NodeRef] {
        &self.collected
    }

    /// Consumes the visitor and returns the collected references.
    pub fn into_refs(self) -> Vec<NodeRef> {
        self.collected
    }
}

impl TreeVisitor for CollectingVisitor {
    fn visit(&mut self, visit: Visit<'_>) {
        self.collected.push(visit.node_ref);
    }
}

/// A visitor that calls a closure for each element.
pub struct FnVisitor<F>
where
    F: FnMut(Visit<'_>),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(Visit<'_>),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> TreeVisitor for FnVisitor<F>
where
    F: FnMut(Visit<'_>),
{
    fn visit(&mut self, visit: Visit<'_>) {
        (self.func)(visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{BspTree, TreeLeaf, TreeNode};
    use crate::{Bounds3, Contents};

    // root -> [node(1) -> [leaf 3, leaf 4], leaf 2]
    fn two_level_tree() -> BspTree {
        let node = |children: [usize; 2]| {
            TreeElement::Node(TreeNode {
                plane_num: 0,
                children: children.map(NodeRef::new),
                bounds: Bounds3::empty(),
            })
        };
        let mut solid = TreeLeaf::empty();
        solid.contents = Contents::SOLID;
        BspTree::from_elements(
            vec![
                node([1, 2]),
                node([3, 4]),
                TreeElement::Leaf(TreeLeaf::empty()),
                TreeElement::Leaf(solid),
                TreeElement::Leaf(TreeLeaf::empty()),
            ],
            NodeRef::new(0),
        )
        .unwrap()
    }

    #[test]
    fn collecting_visitor_empty() {
        let visitor = CollectingVisitor::new();
        assert!(visitor.refs().is_empty());
    }

    #[test]
    fn collecting_visitor_records_preorder() {
        let tree = two_level_tree();
        let mut visitor = CollectingVisitor::new();
        tree.traverse(&mut visitor);

        let order: Vec<usize> = visitor.into_refs().into_iter().map(NodeRef::index).collect();
        assert_eq!(order, vec![0, 1, 3, 4, 2]);
    }

    #[test]
    fn fn_visitor_reports_parents_and_depth() {
        let tree = two_level_tree();
        let mut seen = Vec::new();
        {
            let mut visitor = FnVisitor::new(|visit: Visit<'_>| {
                seen.push((visit.node_ref.index(), visit.parent, visit.depth));
            });
            tree.traverse(&mut visitor);
        }

        assert_eq!(seen[0], (0, None, 0));
        assert_eq!(seen[1], (1, Some((NodeRef::new(0), ChildSide::Front)), 1));
        assert_eq!(seen[3], (4, Some((NodeRef::new(1), ChildSide::Back)), 2));
        assert_eq!(seen[4], (2, Some((NodeRef::new(0), ChildSide::Back)), 1));
    }

    #[test]
    fn leaves_are_reached_front_first() {
        let tree = two_level_tree();
        let leaves: Vec<usize> = tree.leaf_refs().into_iter().map(NodeRef::index).collect();
        assert_eq!(leaves, vec![3, 4, 2]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 2);
    }
}
