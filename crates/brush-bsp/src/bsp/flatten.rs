//! Flattening a tree into the node, leaf and face arrays written to a BSP
//! file.
//!
//! Nodes and leaves are numbered in the order a preorder walk first reaches
//! them, front child before back child. A child slot holds a node index, or
//! `-(leaf + 1)` for a leaf, so leaf 0 is encoded as `-1`.

use crate::{CompileFace, Contents, FaceMap, PlaneNum};

use super::node::TreeElement;
use super::tree::BspTree;
use super::visitor::{TreeVisitor, Visit};

/// Encodes a leaf index as a child slot value.
#[inline]
pub fn encode_leaf(leaf: usize) -> i32 {
    -(leaf as i32) - 1
}

/// A decoded child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    Node(usize),
    Leaf(usize),
}

/// Decodes a child slot value written by [`flatten_tree`].
#[inline]
pub fn decode_child(child: i32) -> ChildRef {
    if child >= 0 {
        ChildRef::Node(child as usize)
    } else {
        ChildRef::Leaf((-(child + 1)) as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub plane_num: PlaneNum,
    /// `[front, back]`, encoded as described in the module docs.
    pub children: [i32; 2],
    pub mins: [i32; 3],
    pub maxs: [i32; 3],
    /// Offset of the node's first face in the serialized face list.
    pub first_face: usize,
    pub num_faces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLeaf {
    pub contents: Contents,
    /// Always -1; filled in by the visibility pass.
    pub cluster: i32,
    /// Always -1; filled in by the area pass.
    pub area: i32,
    pub mins: [i32; 3],
    pub maxs: [i32; 3],
    /// Numbers of the authored brushes touching the leaf, without repeats.
    pub brushes: Vec<usize>,
}

/// Output of [`flatten_tree`]. Faces are borrowed from the face map.
#[derive(Debug, Clone, Default)]
pub struct FlattenedTree<'a> {
    pub nodes: Vec<FlatNode>,
    pub leafs: Vec<FlatLeaf>,
    pub serialized_faces: Vec<&'a CompileFace>,
}

/// Flattens `tree`, attaching the faces `faces` holds for each node.
///
/// Faces are serialized node by node in the order nodes are numbered, each
/// node's faces in the order the map lists them.
pub fn flatten_tree<'a>(tree: &BspTree, faces: &'a FaceMap) -> FlattenedTree<'a> {
    let mut flattener = Flattener {
        faces,
        slots: vec![None; tree.elements().len()],
        out: FlattenedTree::default(),
    };
    tree.traverse(&mut flattener);
    flattener.out
}

struct Flattener<'a> {
    faces: &'a FaceMap,
    /// Encoded output slot of each visited arena element.
    slots: Vec<Option<i32>>,
    out: FlattenedTree<'a>,
}

impl<'a> TreeVisitor for Flattener<'a> {
    fn visit(&mut self, visit: Visit<'_>) {
        let face_map: &'a FaceMap = self.faces;
        let encoded = match visit.element {
            TreeElement::Node(node) => {
                let index = self.out.nodes.len();
                let faces = face_map.get(&visit.node_ref).map_or(&[][..], Vec::as_slice);
                let first_face = self.out.serialized_faces.len();
                self.out.serialized_faces.extend(faces.iter());

                let (mins, maxs) = node.bounds.to_int();
                self.out.nodes.push(FlatNode {
                    plane_num: node.plane_num,
                    // patched when the children are visited
                    children: [0, 0],
                    mins,
                    maxs,
                    first_face,
                    num_faces: faces.len(),
                });
                index as i32
            }
            TreeElement::Leaf(leaf) => {
                let index = self.out.leafs.len();
                let mut brushes: Vec<usize> = Vec::with_capacity(leaf.brushes.len());
                for brush in &leaf.brushes {
                    if !brushes.contains(&brush.brush_num()) {
                        brushes.push(brush.brush_num());
                    }
                }

                let (mins, maxs) = leaf.bounds.to_int();
                self.out.leafs.push(FlatLeaf {
                    contents: leaf.contents,
                    cluster: -1,
                    area: -1,
                    mins,
                    maxs,
                    brushes,
                });
                encode_leaf(index)
            }
        };

        self.slots[visit.node_ref.index()] = Some(encoded);

        if let Some((parent, side)) = visit.parent {
            if let Some(parent_index) = self.slots[parent.index()] {
                self.out.nodes[parent_index as usize].children[side.index()] = encoded;
            }
        }
    }
}
