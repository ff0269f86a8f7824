//! Brush BSP compiler core.
//!
//! Converts convex brushes, each the intersection of a set of half-spaces,
//! into a Binary Space Partitioning tree and flattens it into the node, leaf
//! and face arrays of a BSP file.

pub mod bsp;

mod bounds;
mod brush;
mod compile;
mod config;
mod contents;
mod error;
mod face;
mod plane;
mod plane_set;
mod winding;

#[cfg(test)]
mod test_util;

pub use bounds::Bounds3;
pub use brush::{BrushSideDef, CompileBrush, CompileSide, MapBrush};
pub use bsp::*;
pub use compile::{Compilation, Compiler};
pub use config::{CompileConfig, DEFAULT_MAX_DEPTH};
pub use contents::Contents;
pub use error::{BrushError, CompileError, Result};
pub use face::{CompileFace, FaceMap};
pub use plane::{Classification, Plane, PlaneSide, PlaneType, CLASSIFY_EPSILON, MAX_WORLD_COORD};
pub use plane_set::{PlaneNum, PlaneSet, DIST_EPSILON, NORMAL_EPSILON};
pub use winding::{Winding, MIN_WINDING_AREA};
