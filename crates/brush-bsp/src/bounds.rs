//! Axis-aligned bounding boxes.

use nalgebra::Point3;

/// An axis-aligned bounding box. The empty box has `mins = +inf` and
/// `maxs = -inf` so that any point added to it becomes its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub mins: Point3<f64>,
    pub maxs: Point3<f64>,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds3 {
    /// Creates a box from its corners.
    pub fn new(mins: Point3<f64>, maxs: Point3<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Creates the empty box.
    pub fn empty() -> Self {
        Self {
            mins: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            maxs: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing all `points`. Empty if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.add_point(point);
        }
        bounds
    }

    /// Returns true if no point has been added (any min exceeds its max).
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.mins[i] > self.maxs[i])
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        (0..3).all(|i| self.mins[i].is_finite() && self.maxs[i].is_finite())
    }

    /// Grows the box to include `point`.
    pub fn add_point(&mut self, point: &Point3<f64>) {
        for i in 0..3 {
            self.mins[i] = self.mins[i].min(point[i]);
            self.maxs[i] = self.maxs[i].max(point[i]);
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        let mut out = *self;
        for i in 0..3 {
            out.mins[i] = out.mins[i].min(other.mins[i]);
            out.maxs[i] = out.maxs[i].max(other.maxs[i]);
        }
        out
    }

    /// Returns true if `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| self.mins[i] <= point[i] && point[i] <= self.maxs[i])
    }

    /// Smallest extent over the three axes.
    pub fn min_extent(&self) -> f64 {
        (0..3)
            .map(|i| self.maxs[i] - self.mins[i])
            .fold(f64::INFINITY, f64::min)
    }

    /// Integer bounds as stored by consumers: mins floored, maxs ceiled.
    /// An empty box becomes all zeros.
    pub fn to_int(&self) -> ([i32; 3], [i32; 3]) {
        if self.is_empty() || !self.is_finite() {
            return ([0; 3], [0; 3]);
        }
        (
            [0, 1, 2].map(|i| self.mins[i].floor() as i32),
            [0, 1, 2].map(|i| self.maxs[i].ceil() as i32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_empty() {
        let bounds = Bounds3::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.to_int(), ([0; 3], [0; 3]));
    }

    #[test]
    fn from_points_covers_all_points() {
        let pts = [Point3::new(1.0, -2.0, 3.0), Point3::new(-1.0, 5.0, 0.0)];
        let bounds = Bounds3::from_points(&pts);
        assert_eq!(bounds.mins, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.maxs, Point3::new(1.0, 5.0, 3.0));
        assert!(pts.iter().all(|p| bounds.contains_point(p)));
        assert_eq!(bounds.min_extent(), 2.0);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let bounds = Bounds3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.union(&Bounds3::empty()), bounds);
        assert_eq!(Bounds3::empty().union(&bounds), bounds);
    }

    #[test]
    fn to_int_rounds_outward() {
        let bounds = Bounds3::new(Point3::new(-0.5, 1.2, 2.0), Point3::new(0.5, 1.8, 2.0));
        assert_eq!(bounds.to_int(), ([-1, 1, 2], [1, 2, 2]));
    }
}
