//! BSP tree container and construction.

use std::sync::Arc;

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::{CompileBrush, PlaneSet, DEFAULT_MAX_DEPTH};

use super::node::{union_bounds, ChildSide, NodeRef, TreeElement, TreeLeaf, TreeNode};
use super::partition::{partition_brushes_with_epsilon, Partition};
use super::selector::{ScoredSelector, SplitSelector, UsedPlanes};
use super::visitor::{CollectingVisitor, FnVisitor, TreeVisitor, Visit};

/// A brush BSP tree stored as an arena of nodes and leaves.
///
/// Interior nodes reference their children by [`NodeRef`]. Child 0 is
/// always the front of the node's plane, child 1 the back.
///
/// # Construction
///
/// ```ignore
/// use brush_bsp::{build_tree, PlaneSet};
///
/// let mut planes = PlaneSet::new();
/// let brushes = /* adapt map brushes against `planes` */;
/// let tree = build_tree(brushes, &planes);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BspTree {
    elements: Vec<TreeElement>,
    root: NodeRef,
}

impl BspTree {
    /// A tree made of a single empty leaf.
    pub fn empty() -> Self {
        Self {
            elements: vec![TreeElement::Leaf(TreeLeaf::empty())],
            root: NodeRef::new(0),
        }
    }

    /// Assembles a tree from prebuilt elements.
    ///
    /// Every element must be reached exactly once when descending from
    /// `root`. Returns `None` for out of range references, cycles, elements
    /// shared between parents and unreachable elements.
    pub fn from_elements(elements: Vec<TreeElement>, root: NodeRef) -> Option<Self> {
        let len = elements.len();
        let mut seen = vec![false; len];
        let mut stack = vec![root];
        let mut reached = 0;
        while let Some(node_ref) = stack.pop() {
            let slot = seen.get_mut(node_ref.index())?;
            if *slot {
                return None;
            }
            *slot = true;
            reached += 1;
            if let TreeElement::Node(node) = &elements[node_ref.index()] {
                stack.extend(node.children);
            }
        }
        (reached == len).then_some(Self { elements, root })
    }

    #[inline]
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// # Panics
    /// Panics if `node_ref` does not belong to this tree.
    #[inline]
    pub fn get(&self, node_ref: NodeRef) -> &TreeElement {
        &self.elements[node_ref.index()]
    }

    #[inline]
    pub fn is_leaf(&self, node_ref: NodeRef) -> bool {
        self.get(node_ref).is_leaf()
    }

    /// All elements in arena order.
    #[inline]
    pub fn elements(&self) -> &[TreeElement] {
        &self.elements
    }

    pub fn node_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_leaf()).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_leaf()).count()
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut visitor = FnVisitor::new(|visit: Visit<'_>| {
            if visit.element.is_leaf() {
                deepest = deepest.max(visit.depth);
            }
        });
        self.traverse(&mut visitor);
        deepest
    }

    /// Leaves in front-before-back order.
    pub fn leaf_refs(&self) -> Vec<NodeRef> {
        let mut visitor = CollectingVisitor::new();
        self.traverse(&mut visitor);
        visitor
            .into_refs()
            .into_iter()
            .filter(|r| self.is_leaf(*r))
            .collect()
    }

    /// Finds the leaf containing `point`. Points on a plane go to the front.
    pub fn point_leaf(&self, point: &Point3<f64>, planes: &PlaneSet) -> NodeRef {
        let mut current = self.root;
        while let TreeElement::Node(node) = self.get(current) {
            let d = planes.get(node.plane_num).signed_distance(point);
            current = if d >= 0.0 { node.front() } else { node.back() };
        }
        current
    }

    /// Walks the tree in preorder, front subtree before back subtree.
    pub fn traverse<V: TreeVisitor>(&self, visitor: &mut V) {
        let mut stack = vec![(self.root, None, 0)];
        while let Some((node_ref, parent, depth)) = stack.pop() {
            let element = self.get(node_ref);
            visitor.visit(Visit {
                node_ref,
                element,
                parent,
                depth,
            });
            if let TreeElement::Node(node) = element {
                stack.push((node.back(), Some((node_ref, ChildSide::Back)), depth + 1));
                stack.push((node.front(), Some((node_ref, ChildSide::Front)), depth + 1));
            }
        }
    }
}

impl Default for BspTree {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counters collected while building a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: usize,
    pub leaves: usize,
    /// Brushes cut in two by a node plane.
    pub splits: usize,
    /// Leaves emitted because the depth limit was reached.
    pub depth_limited: usize,
    /// Non-empty leaves emitted because no unused plane was left.
    pub exhausted: usize,
    /// Deepest level reached, relative to the start depth.
    pub depth: usize,
}

/// Builds [`BspTree`]s from compiled brushes.
#[derive(Debug, Clone)]
pub struct TreeBuilder<S = ScoredSelector> {
    selector: S,
    max_depth: usize,
    start_depth: usize,
    used_planes: UsedPlanes,
    epsilon: f64,
}

impl Default for TreeBuilder<ScoredSelector> {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder<ScoredSelector> {
    pub fn new() -> Self {
        Self::with_selector(ScoredSelector::default())
    }
}

impl<S: SplitSelector> TreeBuilder<S> {
    pub fn with_selector(selector: S) -> Self {
        Self {
            selector,
            max_depth: DEFAULT_MAX_DEPTH,
            start_depth: 0,
            used_planes: UsedPlanes::new(),
            epsilon: crate::CLASSIFY_EPSILON,
        }
    }

    /// Depth at which remaining brushes are put into a single leaf.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Depth assigned to the root.
    pub fn start_depth(mut self, depth: usize) -> Self {
        self.start_depth = depth;
        self
    }

    /// Planes the root must not split on.
    pub fn used_planes(mut self, used: UsedPlanes) -> Self {
        self.used_planes = used;
        self
    }

    /// Classification tolerance used when partitioning.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn build(&self, brushes: Vec<Arc<CompileBrush>>, planes: &PlaneSet) -> BspTree {
        self.build_with_stats(brushes, planes).0
    }

    /// Builds the tree and reports what happened along the way.
    #[tracing::instrument(level = "debug", skip_all, fields(brushes = brushes.len()))]
    pub fn build_with_stats(
        &self,
        brushes: Vec<Arc<CompileBrush>>,
        planes: &PlaneSet,
    ) -> (BspTree, BuildStats) {
        let mut stats = BuildStats::default();
        // every slot is overwritten before the build returns
        let mut elements = vec![TreeElement::Leaf(TreeLeaf::empty())];
        let mut work = vec![Task {
            brushes,
            used: self.used_planes.clone(),
            depth: self.start_depth,
            slot: 0,
        }];

        while let Some(task) = work.pop() {
            stats.depth = stats.depth.max(task.depth.saturating_sub(self.start_depth));
            let placed = self.build_element(task, planes, &mut elements, &mut work, &mut stats);
            if placed.element.is_leaf() {
                stats.leaves += 1;
            } else {
                stats.nodes += 1;
            }
            elements[placed.slot] = placed.element;
        }

        debug!(
            nodes = stats.nodes,
            leaves = stats.leaves,
            splits = stats.splits,
            depth = stats.depth,
            depth_limited = stats.depth_limited,
            exhausted = stats.exhausted,
            "built bsp tree"
        );

        let tree = BspTree {
            elements,
            root: NodeRef::new(0),
        };
        (tree, stats)
    }

    fn build_element(
        &self,
        task: Task,
        planes: &PlaneSet,
        elements: &mut Vec<TreeElement>,
        work: &mut Vec<Task>,
        stats: &mut BuildStats,
    ) -> Placed {
        let Task {
            brushes,
            used,
            depth,
            slot,
        } = task;

        if brushes.is_empty() {
            return Placed::leaf(slot, TreeLeaf::empty());
        }

        if depth >= self.max_depth {
            debug!(
                depth,
                brushes = brushes.len(),
                "depth limit reached, emitting unsplit leaf"
            );
            stats.depth_limited += 1;
            return Placed::leaf(slot, TreeLeaf::from_brushes(brushes));
        }

        let Some(candidate) = self.selector.select(&brushes, planes, &used) else {
            debug!(
                depth,
                brushes = brushes.len(),
                "no unused plane left, emitting leaf"
            );
            stats.exhausted += 1;
            return Placed::leaf(slot, TreeLeaf::from_brushes(brushes));
        };

        trace!(
            plane = candidate.plane_num,
            front = candidate.front_count,
            back = candidate.back_count,
            split = candidate.split_count,
            depth,
            "splitting"
        );
        stats.splits += candidate.split_count;

        let bounds = union_bounds(&brushes);
        let Partition { front, back } =
            partition_brushes_with_epsilon(&brushes, candidate.plane_num, planes, self.epsilon);

        let front_slot = elements.len();
        let back_slot = front_slot + 1;
        elements.push(TreeElement::Leaf(TreeLeaf::empty()));
        elements.push(TreeElement::Leaf(TreeLeaf::empty()));

        let child_used = used.with(candidate.plane_num);
        // back is pushed first so the front subtree is finished before it
        work.push(Task {
            brushes: back,
            used: child_used.clone(),
            depth: depth + 1,
            slot: back_slot,
        });
        work.push(Task {
            brushes: front,
            used: child_used,
            depth: depth + 1,
            slot: front_slot,
        });

        Placed {
            slot,
            element: TreeElement::Node(TreeNode {
                plane_num: candidate.plane_num,
                children: [NodeRef::new(front_slot), NodeRef::new(back_slot)],
                bounds,
            }),
        }
    }
}

struct Task {
    brushes: Vec<Arc<CompileBrush>>,
    used: UsedPlanes,
    depth: usize,
    slot: usize,
}

struct Placed {
    slot: usize,
    element: TreeElement,
}

impl Placed {
    fn leaf(slot: usize, leaf: TreeLeaf) -> Self {
        Self {
            slot,
            element: TreeElement::Leaf(leaf),
        }
    }
}

/// Builds a tree with the default [`TreeBuilder`].
pub fn build_tree(brushes: Vec<Arc<CompileBrush>>, planes: &PlaneSet) -> BspTree {
    TreeBuilder::new().build(brushes, planes)
}
