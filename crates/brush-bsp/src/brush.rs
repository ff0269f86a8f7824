//! Brushes: authored input and the compiler's working form.
//!
//! A [`MapBrush`] is what the authoring side hands over: a list of outward
//! facing half-spaces and a contents mask. [`CompileBrush::from_map_brush`]
//! is the only place where that form crosses into the compiler. It binds
//! every side to a [`PlaneSet`] entry, builds the side windings and computes
//! exact bounds. From then on a `CompileBrush` is immutable; splitting one
//! produces new brushes.

use nalgebra::{Point3, Vector3};

use crate::{
    BrushError, Bounds3, Classification, Contents, Plane, PlaneNum, PlaneSet, Winding,
    CLASSIFY_EPSILON, MAX_WORLD_COORD,
};

/// Brushes reaching further out than this are treated as open.
const BRUSH_COORD_LIMIT: f64 = MAX_WORLD_COORD * 0.5;

/// Brushes thinner than this along any axis enclose no usable volume.
const MIN_BRUSH_EXTENT: f64 = CLASSIFY_EPSILON;

/// One authored half-space: points `p` with `normal · p <= dist` are inside.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSideDef {
    pub normal: Vector3<f64>,
    pub dist: f64,
    /// Texture reference carried through for the surface pass.
    pub tex_info: usize,
}

impl BrushSideDef {
    pub fn new(normal: Vector3<f64>, dist: f64) -> Self {
        Self {
            normal,
            dist,
            tex_info: 0,
        }
    }
}

/// A convex brush as produced by an authoring tool.
#[derive(Debug, Clone, PartialEq)]
pub struct MapBrush {
    pub sides: Vec<BrushSideDef>,
    pub contents: Contents,
}

/// A side of a [`CompileBrush`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompileSide {
    /// Plane the side lies on.
    pub plane_num: PlaneNum,
    /// `true` when the plane normal points out of the brush. Cap sides added
    /// on the front fragment of a split face the other way.
    pub facing_out: bool,
    /// Texture of an authored side, `None` for split caps.
    pub tex_info: Option<usize>,
    /// Part of the plane covered by the brush, `None` if the side does not
    /// touch the brush volume.
    pub winding: Option<Winding>,
}

impl CompileSide {
    /// Returns the side's plane oriented so that its normal points out of the brush.
    pub fn outward_plane(&self, planes: &PlaneSet) -> Plane {
        let plane = planes.get(self.plane_num);
        if self.facing_out {
            plane.clone()
        } else {
            plane.flipped()
        }
    }
}

/// A brush bound to a [`PlaneSet`], ready for partitioning.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileBrush {
    brush_num: usize,
    sides: Vec<CompileSide>,
    contents: Contents,
    bounds: Bounds3,
}

impl CompileBrush {
    /// Converts an authored brush, registering its planes in `planes`.
    ///
    /// `brush_num` identifies the authored brush; fragments produced by
    /// splitting keep it.
    pub fn from_map_brush(
        brush: &MapBrush,
        brush_num: usize,
        planes: &mut PlaneSet,
    ) -> Result<Self, BrushError> {
        if brush.sides.is_empty() {
            return Err(BrushError::NoSides);
        }

        let mut sides: Vec<CompileSide> = Vec::with_capacity(brush.sides.len());
        for (index, def) in brush.sides.iter().enumerate() {
            if !def.dist.is_finite() || def.normal.iter().any(|c| !c.is_finite()) {
                return Err(BrushError::NonFinitePlane { side: index });
            }
            let length = def.normal.norm();
            if length > 0.0 && (def.dist / length).abs() > MAX_WORLD_COORD {
                let reach = (def.dist / length).abs();
                return Err(BrushError::Unbounded {
                    mins: [-reach; 3],
                    maxs: [reach; 3],
                });
            }
            let plane_num = planes
                .find_or_add(def.normal, def.dist)
                .ok_or(BrushError::DegenerateNormal { side: index })?;

            // duplicate sides add nothing
            if sides.iter().any(|s| s.plane_num == plane_num) {
                continue;
            }
            sides.push(CompileSide {
                plane_num,
                facing_out: true,
                tex_info: Some(def.tex_info),
                winding: None,
            });
        }

        let side_planes: Vec<Plane> = sides.iter().map(|s| s.outward_plane(planes)).collect();
        for (i, side) in sides.iter_mut().enumerate() {
            side.winding = clip_to_brush(Winding::base_for_plane(&side_planes[i]), &side_planes, Some(i));
        }

        let bounds = bounds_of(&sides);
        if bounds.is_empty() {
            return Err(BrushError::Empty);
        }
        if (0..3).any(|i| bounds.mins[i] <= -BRUSH_COORD_LIMIT || bounds.maxs[i] >= BRUSH_COORD_LIMIT) {
            return Err(BrushError::Unbounded {
                mins: bounds.mins.into(),
                maxs: bounds.maxs.into(),
            });
        }

        Self::from_parts(brush_num, sides, brush.contents).ok_or(BrushError::Empty)
    }

    /// Assembles a brush from sides whose windings are already computed.
    ///
    /// Returns `None` if the sides do not enclose a volume.
    pub(crate) fn from_parts(
        brush_num: usize,
        sides: Vec<CompileSide>,
        contents: Contents,
    ) -> Option<Self> {
        let faces = sides.iter().filter(|s| s.winding.is_some()).count();
        if faces < 4 {
            return None;
        }

        let bounds = bounds_of(&sides);
        if bounds.is_empty() || !bounds.is_finite() || bounds.min_extent() < MIN_BRUSH_EXTENT {
            return None;
        }

        Some(Self {
            brush_num,
            sides,
            contents,
            bounds,
        })
    }

    /// Index of the authored brush this one came from.
    #[inline]
    pub fn brush_num(&self) -> usize {
        self.brush_num
    }

    #[inline]
    pub fn sides(&self) -> &[CompileSide] {
        &self.sides
    }

    #[inline]
    pub fn contents(&self) -> Contents {
        self.contents
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds3 {
        &self.bounds
    }

    /// Iterates over the corner points of all side windings.
    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.sides
            .iter()
            .filter_map(|s| s.winding.as_ref())
            .flat_map(|w| w.points().iter())
    }

    /// Classifies the brush against a plane.
    ///
    /// The bounding box decides whenever its extremes are conclusive. Axial
    /// planes are always decided by the box; other planes that cut the box
    /// are refined with the winding points.
    pub fn classify(&self, plane: &Plane, epsilon: f64) -> Classification {
        let (near, far) = plane.box_extremes(&self.bounds.mins, &self.bounds.maxs);
        if near >= -epsilon && far <= epsilon {
            return Classification::Coplanar;
        }
        if near >= -epsilon {
            return Classification::Front;
        }
        if far <= epsilon {
            return Classification::Back;
        }
        if plane.is_axial() {
            return Classification::Spanning;
        }

        let mut front = false;
        let mut back = false;
        for point in self.points() {
            let d = plane.signed_distance(point);
            front |= d > epsilon;
            back |= d < -epsilon;
            if front && back {
                return Classification::Spanning;
            }
        }
        match (front, back) {
            (true, _) => Classification::Front,
            (_, true) => Classification::Back,
            _ => Classification::Coplanar,
        }
    }
}

/// Clips a winding by every outward plane except `skip`, keeping the inside.
pub(crate) fn clip_to_brush(
    winding: Winding,
    planes: &[Plane],
    skip: Option<usize>,
) -> Option<Winding> {
    let mut winding = winding;
    for (j, plane) in planes.iter().enumerate() {
        if Some(j) == skip {
            continue;
        }
        winding = winding.clip(plane, CLASSIFY_EPSILON, false)?;
    }
    (!winding.is_tiny()).then_some(winding)
}

fn bounds_of(sides: &[CompileSide]) -> Bounds3 {
    Bounds3::from_points(
        sides
            .iter()
            .filter_map(|s| s.winding.as_ref())
            .flat_map(|w| w.points().iter()),
    )
}
