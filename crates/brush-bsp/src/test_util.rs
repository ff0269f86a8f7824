//! Brush authoring helpers for tests.

use std::sync::Arc;

use nalgebra::Vector3;

use crate::{BrushSideDef, CompileBrush, Contents, MapBrush, PlaneSet};

/// An axis-aligned box centered on `origin`. Sides are emitted in the
/// order top, bottom, north, south, east, west.
pub(crate) fn box_brush(origin: [f64; 3], size: [f64; 3], contents: Contents) -> MapBrush {
    let mins: [f64; 3] = std::array::from_fn(|i| origin[i] - size[i] * 0.5);
    let maxs: [f64; 3] = std::array::from_fn(|i| origin[i] + size[i] * 0.5);

    MapBrush {
        sides: vec![
            BrushSideDef::new(Vector3::new(0.0, 0.0, 1.0), maxs[2]),
            BrushSideDef::new(Vector3::new(0.0, 0.0, -1.0), -mins[2]),
            BrushSideDef::new(Vector3::new(0.0, 1.0, 0.0), maxs[1]),
            BrushSideDef::new(Vector3::new(0.0, -1.0, 0.0), -mins[1]),
            BrushSideDef::new(Vector3::new(1.0, 0.0, 0.0), maxs[0]),
            BrushSideDef::new(Vector3::new(-1.0, 0.0, 0.0), -mins[0]),
        ],
        contents,
    }
}

/// Compiles a solid cube of edge `size` centered on `origin`.
pub(crate) fn cube(planes: &mut PlaneSet, brush_num: usize, origin: [f64; 3], size: f64) -> Arc<CompileBrush> {
    solid_box(planes, brush_num, origin, [size; 3], Contents::SOLID)
}

pub(crate) fn solid_box(
    planes: &mut PlaneSet,
    brush_num: usize,
    origin: [f64; 3],
    size: [f64; 3],
    contents: Contents,
) -> Arc<CompileBrush> {
    let def = box_brush(origin, size, contents);
    Arc::new(CompileBrush::from_map_brush(&def, brush_num, planes).unwrap())
}
