//! Faces handed to the flattener by the surface pass.

use std::collections::HashMap;

use crate::{Contents, NodeRef, PlaneNum, Winding};

/// A renderable face produced by the surface pass and attached to a tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileFace {
    pub plane_num: PlaneNum,
    pub tex_info: usize,
    pub contents: Contents,
    /// Next face merged onto the same node, as an index into that node's list.
    pub next: Option<usize>,
    pub winding: Winding,
}

/// Faces attached to each tree node, in the order they are serialized.
pub type FaceMap = HashMap<NodeRef, Vec<CompileFace>>;
