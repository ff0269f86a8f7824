//! Convex polygon loops ("windings") lying on brush sides.

use nalgebra::{Point3, Vector3};

use crate::{Bounds3, Classification, Plane, PlaneSide, MAX_WORLD_COORD};

/// Windings with less area than this are treated as degenerate.
pub const MIN_WINDING_AREA: f64 = 0.01;

/// A convex polygon in 3D space, defined by an ordered list of points.
///
/// Points are coplanar and wound clockwise when viewed from the front of
/// the plane they lie on.
#[derive(Debug, Clone, PartialEq)]
pub struct Winding {
    points: Vec<Point3<f64>>,
}

impl Winding {
    /// Creates a new winding from a list of points.
    ///
    /// # Panics (debug builds only)
    /// Panics if fewer than 3 points are provided.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        debug_assert!(points.len() >= 3, "Winding must have at least 3 points");
        Self { points }
    }

    /// Creates a square winding on `plane` that reaches past the world bounds.
    ///
    /// Clipping this winding by the other sides of a brush yields the face
    /// of the brush on `plane`.
    pub fn base_for_plane(plane: &Plane) -> Self {
        let normal = plane.normal();
        let mut vup = match plane.kind().axis() {
            0 | 1 => Vector3::new(0.0, 0.0, 1.0),
            _ => Vector3::new(1.0, 0.0, 0.0),
        };
        vup -= normal * vup.dot(&normal);
        vup = vup.normalize();

        let org = Point3::from(normal * plane.dist());
        let vright = vup.cross(&normal);

        let vup = vup * MAX_WORLD_COORD;
        let vright = vright * MAX_WORLD_COORD;

        Self {
            points: vec![
                org - vright + vup,
                org + vright + vup,
                org + vright - vup,
                org - vright - vup,
            ],
        }
    }

    /// Returns the points of the winding.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the same polygon wound the other way, facing the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    pub fn bounds(&self) -> Bounds3 {
        Bounds3::from_points(&self.points)
    }

    /// Computes the area of the polygon by fan triangulation.
    pub fn area(&self) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        self.points
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0] - first).cross(&(pair[1] - first)).norm() * 0.5)
            .sum()
    }

    /// Computes the average of the points.
    pub fn center(&self) -> Point3<f64> {
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.points.len() as f64)
    }

    /// Returns true if the winding is too small to bound a volume.
    pub fn is_tiny(&self) -> bool {
        self.points.len() < 3 || self.area() < MIN_WINDING_AREA
    }

    /// Classifies this winding relative to a plane.
    ///
    /// Returns:
    /// - `Front` if no point is behind the plane
    /// - `Back` if no point is in front of the plane
    /// - `Coplanar` if all points lie on the plane
    /// - `Spanning` if points are on both sides
    pub fn classify(&self, plane: &Plane, epsilon: f64) -> Classification {
        let mut front = 0;
        let mut back = 0;

        for point in &self.points {
            match plane.classify_point(point, epsilon) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (0, 0) => Classification::Coplanar,
            (_, 0) => Classification::Front,
            (0, _) => Classification::Back,
            _ => Classification::Spanning,
        }
    }

    /// Splits the winding by a plane.
    ///
    /// Returns `(front, back)`:
    /// - **Front**: `(Some(self), None)`
    /// - **Back**: `(None, Some(self))`
    /// - **Coplanar**: `(Some(self), None)` - treated as front
    /// - **Spanning**: `(Some(front_part), Some(back_part))`
    pub fn split(&self, plane: &Plane, epsilon: f64) -> (Option<Winding>, Option<Winding>) {
        match self.classify(plane, epsilon) {
            Classification::Front | Classification::Coplanar => (Some(self.clone()), None),
            Classification::Back => (None, Some(self.clone())),
            Classification::Spanning => self.split_spanning(plane, epsilon),
        }
    }

    /// Keeps the part of the winding on one side of the plane.
    ///
    /// A coplanar winding survives only when keeping the front.
    pub fn clip(&self, plane: &Plane, epsilon: f64, keep_front: bool) -> Option<Winding> {
        let (front, back) = self.split(plane, epsilon);
        if keep_front { front } else { back }
    }

    /// Sutherland-Hodgman split of a spanning winding: walks the edges and
    /// builds two point lists, adding the crossing point to both whenever an
    /// edge passes through the plane.
    fn split_spanning(&self, plane: &Plane, epsilon: f64) -> (Option<Winding>, Option<Winding>) {
        let points = &self.points;
        let n = points.len();

        let mut front_pts = Vec::with_capacity(n + 1);
        let mut back_pts = Vec::with_capacity(n + 1);

        let sides: Vec<PlaneSide> = points
            .iter()
            .map(|p| plane.classify_point(p, epsilon))
            .collect();

        for i in 0..n {
            let current = points[i];
            let next_idx = (i + 1) % n;

            match sides[i] {
                PlaneSide::Front => front_pts.push(current),
                PlaneSide::Back => back_pts.push(current),
                PlaneSide::OnPlane => {
                    front_pts.push(current);
                    back_pts.push(current);
                }
            }

            let crosses = matches!(
                (sides[i], sides[next_idx]),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            );

            if crosses {
                if let Some(mid) = plane.intersect_segment(&current, &points[next_idx]) {
                    front_pts.push(mid);
                    back_pts.push(mid);
                }
            }
        }

        let front = (front_pts.len() >= 3).then(|| Winding::new(front_pts));
        let back = (back_pts.len() >= 3).then(|| Winding::new(back_pts));
        (front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CLASSIFY: f64 = crate::CLASSIFY_EPSILON;

    fn square(z: f64, half: f64) -> Winding {
        Winding::new(vec![
            Point3::new(-half, half, z),
            Point3::new(half, half, z),
            Point3::new(half, -half, z),
            Point3::new(-half, -half, z),
        ])
    }

    fn plane(normal: [f64; 3], dist: f64) -> Plane {
        Plane::new(Vector3::new(normal[0], normal[1], normal[2]), dist).unwrap()
    }

    #[test]
    fn base_winding_lies_on_plane_and_is_huge() {
        let p = plane([1.0, 2.0, 3.0], 10.0);
        let w = Winding::base_for_plane(&p);
        assert_eq!(w.len(), 4);
        for point in w.points() {
            assert!(p.signed_distance(point).abs() < 1e-6);
        }
        assert!(w.area() > MAX_WORLD_COORD * MAX_WORLD_COORD);
    }

    #[test]
    fn base_winding_faces_plane_normal() {
        let p = plane([0.0, 0.0, 1.0], 0.0);
        let w = Winding::base_for_plane(&p);
        let pts = w.points();
        let normal = (pts[0] - pts[1]).cross(&(pts[2] - pts[1])).normalize();
        assert_relative_eq!(normal, p.normal(), epsilon = 1e-9);
    }

    #[test]
    fn area_and_center_of_square() {
        let w = square(2.0, 1.0);
        assert_relative_eq!(w.area(), 4.0);
        assert_relative_eq!(w.center(), Point3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn classify_sides() {
        let w = square(0.0, 1.0);
        assert_eq!(w.classify(&plane([0.0, 0.0, 1.0], -1.0), CLASSIFY), Classification::Front);
        assert_eq!(w.classify(&plane([0.0, 0.0, 1.0], 1.0), CLASSIFY), Classification::Back);
        assert_eq!(w.classify(&plane([0.0, 0.0, 1.0], 0.0), CLASSIFY), Classification::Coplanar);
        assert_eq!(w.classify(&plane([1.0, 0.0, 0.0], 0.0), CLASSIFY), Classification::Spanning);
    }

    #[test]
    fn split_spanning_square_in_half() {
        let w = square(0.0, 1.0);
        let (front, back) = w.split(&plane([1.0, 0.0, 0.0], 0.0), CLASSIFY);
        let front = front.unwrap();
        let back = back.unwrap();

        assert_relative_eq!(front.area(), 2.0);
        assert_relative_eq!(back.area(), 2.0);
        assert_eq!(front.bounds().mins.x, 0.0);
        assert_eq!(back.bounds().maxs.x, 0.0);
    }

    #[test]
    fn split_through_vertices_shares_on_points() {
        let w = square(0.0, 1.0);
        let diagonal = plane([1.0, 1.0, 0.0], 0.0);
        let (front, back) = w.split(&diagonal, CLASSIFY);
        assert_eq!(front.unwrap().len(), 3);
        assert_eq!(back.unwrap().len(), 3);
    }

    #[test]
    fn clip_keeps_requested_side() {
        let w = square(0.0, 2.0);
        let p = plane([0.0, 1.0, 0.0], 1.0);
        let kept = w.clip(&p, CLASSIFY, false).unwrap();
        assert_relative_eq!(kept.bounds().maxs.y, 1.0);
        assert!(w.clip(&plane([0.0, 1.0, 0.0], 5.0), CLASSIFY, true).is_none());
    }

    #[test]
    fn reversed_flips_winding_order() {
        let w = square(0.0, 1.0);
        let r = w.reversed();
        assert_eq!(r.points()[0], w.points()[3]);
        assert_relative_eq!(r.area(), w.area());
    }

    #[test]
    fn tiny_winding_detection() {
        assert!(square(0.0, 0.01).is_tiny());
        assert!(!square(0.0, 1.0).is_tiny());
    }
}
