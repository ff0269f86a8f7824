//! Plane representation and classification for brush compilation.

use nalgebra::{Point3, Vector3};

/// Tolerance used when classifying brushes and windings against a plane.
/// Points within this distance of the plane are considered "on" the plane.
pub const CLASSIFY_EPSILON: f64 = 0.01;

/// Half extent of the world. Base windings are built at this size and any
/// brush reaching it is considered unbounded.
pub const MAX_WORLD_COORD: f64 = (1 << 20) as f64;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a winding or brush relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Everything is in front of the plane
    Front,
    /// Everything is behind the plane
    Back,
    /// Everything lies on the plane
    Coplanar,
    /// Geometry lies on both sides of the plane
    Spanning,
}

/// Axis tag of a plane.
///
/// Axial planes have a normal along exactly one coordinate axis; for the
/// others the tag records the dominant axis of the normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneType {
    X,
    Y,
    Z,
    AnyX,
    AnyY,
    AnyZ,
}

impl PlaneType {
    /// Derives the tag from a unit normal.
    pub fn from_normal(normal: &Vector3<f64>) -> Self {
        if normal.x == 1.0 || normal.x == -1.0 {
            return Self::X;
        }
        if normal.y == 1.0 || normal.y == -1.0 {
            return Self::Y;
        }
        if normal.z == 1.0 || normal.z == -1.0 {
            return Self::Z;
        }

        let ax = normal.x.abs();
        let ay = normal.y.abs();
        let az = normal.z.abs();
        if ax >= ay && ax >= az {
            Self::AnyX
        } else if ay >= ax && ay >= az {
            Self::AnyY
        } else {
            Self::AnyZ
        }
    }

    #[inline]
    pub fn is_axial(self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }

    /// Index of the (dominant) axis: 0 for X, 1 for Y, 2 for Z.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Self::X | Self::AnyX => 0,
            Self::Y | Self::AnyY => 1,
            Self::Z | Self::AnyZ => 2,
        }
    }
}

/// A plane in 3D space, represented as `normal · point = dist`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<f64>,
    dist: f64,
    kind: PlaneType,
}

impl Plane {
    /// Creates a new plane from a normal vector and distance.
    /// The normal is normalized and the distance scaled with it.
    ///
    /// Returns `None` if the normal has zero length or either input is not finite.
    pub fn new(normal: Vector3<f64>, dist: f64) -> Option<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || !dist.is_finite() || norm <= f64::EPSILON {
            return None;
        }
        let normal = normal / norm;
        Some(Self {
            kind: PlaneType::from_normal(&normal),
            normal,
            dist: dist / norm,
        })
    }

    /// Creates a plane from an already normalized normal, without checks.
    pub(crate) fn from_unit(normal: Vector3<f64>, dist: f64) -> Self {
        Self {
            kind: PlaneType::from_normal(&normal),
            normal,
            dist,
        }
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn dist(&self) -> f64 {
        self.dist
    }

    #[inline]
    pub fn kind(&self) -> PlaneType {
        self.kind
    }

    #[inline]
    pub fn is_axial(&self) -> bool {
        self.kind.is_axial()
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.dist
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: &Point3<f64>, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns the range of signed distances covered by an axis-aligned box.
    ///
    /// The first value is the distance of the corner furthest behind the
    /// plane, the second of the corner furthest in front.
    pub fn box_extremes(&self, mins: &Point3<f64>, maxs: &Point3<f64>) -> (f64, f64) {
        let mut near = Point3::origin();
        let mut far = Point3::origin();
        for i in 0..3 {
            if self.normal[i] < 0.0 {
                near[i] = maxs[i];
                far[i] = mins[i];
            } else {
                near[i] = mins[i];
                far[i] = maxs[i];
            }
        }
        (self.signed_distance(&near), self.signed_distance(&far))
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            dist: -self.dist,
            kind: self.kind,
        }
    }

    /// Computes the intersection of a line segment with the plane.
    ///
    /// Coordinates along an axial normal are snapped to the plane distance
    /// so cuts on axial planes land exactly on the plane.
    ///
    /// Returns `None` if the segment is parallel to the plane.
    pub fn intersect_segment(&self, start: &Point3<f64>, end: &Point3<f64>) -> Option<Point3<f64>> {
        let d1 = self.signed_distance(start);
        let d2 = self.signed_distance(end);
        let denom = d1 - d2;
        if denom.abs() < f64::EPSILON {
            return None;
        }

        let t = d1 / denom;
        let mut mid = start + (end - start) * t;
        for i in 0..3 {
            if self.normal[i] == 1.0 {
                mid[i] = self.dist;
            } else if self.normal[i] == -1.0 {
                mid[i] = -self.dist;
            }
        }
        Some(mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes_normal_and_dist() {
        let plane = Plane::new(Vector3::new(0.0, 0.0, 2.0), 4.0).unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.dist(), 2.0);
        assert_eq!(plane.kind(), PlaneType::Z);
    }

    #[test]
    fn new_rejects_zero_and_nan() {
        assert!(Plane::new(Vector3::zeros(), 1.0).is_none());
        assert!(Plane::new(Vector3::new(1.0, 0.0, 0.0), f64::NAN).is_none());
    }

    #[test]
    fn plane_type_of_diagonal_is_dominant_axis() {
        let plane = Plane::new(Vector3::new(1.0, 2.0, 0.5), 0.0).unwrap();
        assert_eq!(plane.kind(), PlaneType::AnyY);
        assert!(!plane.is_axial());
        assert_eq!(plane.kind().axis(), 1);
    }

    #[test]
    fn classify_point_sides() {
        let plane = Plane::new(Vector3::new(1.0, 0.0, 0.0), 10.0).unwrap();
        assert_eq!(plane.classify_point(&Point3::new(11.0, 0.0, 0.0), CLASSIFY_EPSILON), PlaneSide::Front);
        assert_eq!(plane.classify_point(&Point3::new(9.0, 0.0, 0.0), CLASSIFY_EPSILON), PlaneSide::Back);
        assert_eq!(
            plane.classify_point(&Point3::new(10.005, 5.0, 0.0), CLASSIFY_EPSILON),
            PlaneSide::OnPlane
        );
    }

    #[test]
    fn box_extremes_follow_normal_signs() {
        let plane = Plane::new(Vector3::new(-1.0, 0.0, 0.0), 0.0).unwrap();
        let (near, far) = plane.box_extremes(&Point3::new(-2.0, -1.0, -1.0), &Point3::new(4.0, 1.0, 1.0));
        assert_relative_eq!(near, -4.0);
        assert_relative_eq!(far, 2.0);
    }

    #[test]
    fn flipped_reverses_sides() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 3.0).unwrap();
        let flipped = plane.flipped();
        let p = Point3::new(0.0, 5.0, 0.0);
        assert_relative_eq!(plane.signed_distance(&p), -flipped.signed_distance(&p));
    }

    #[test]
    fn intersect_segment_snaps_axial_coordinate() {
        let plane = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.3).unwrap();
        let hit = plane
            .intersect_segment(&Point3::new(-1.0, 2.0, 0.0), &Point3::new(1.0, 4.0, 0.0))
            .unwrap();
        assert_eq!(hit.x, 0.3);
        assert_relative_eq!(hit.y, 3.3);
    }

    #[test]
    fn intersect_segment_parallel_is_none() {
        let plane = Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0).unwrap();
        assert!(plane
            .intersect_segment(&Point3::new(0.0, 0.0, 1.0), &Point3::new(5.0, 0.0, 1.0))
            .is_none());
    }
}
