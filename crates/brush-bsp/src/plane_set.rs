//! Canonicalizing plane registry.
//!
//! Every plane that takes part in a compile is registered here exactly once.
//! Brush sides, split candidates and tree nodes refer to planes by
//! [`PlaneNum`], so two planes that are equal within tolerance must resolve
//! to the same number. A `PlaneSet` belongs to a single compile run.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::Plane;

/// Normals whose components differ by less than this are considered equal.
pub const NORMAL_EPSILON: f64 = 1e-5;

/// Distances closer than this are considered equal.
pub const DIST_EPSILON: f64 = 0.01;

/// Index of a plane inside a [`PlaneSet`].
pub type PlaneNum = usize;

/// Append-only registry mapping `(normal, dist)` to a stable [`PlaneNum`].
#[derive(Debug, Clone)]
pub struct PlaneSet {
    planes: Vec<Plane>,
    buckets: HashMap<i64, Vec<PlaneNum>>,
    normal_epsilon: f64,
    dist_epsilon: f64,
}

impl Default for PlaneSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneSet {
    /// Creates an empty set with the default tolerances.
    pub fn new() -> Self {
        Self::with_epsilons(NORMAL_EPSILON, DIST_EPSILON)
    }

    /// Creates an empty set with custom tolerances.
    pub fn with_epsilons(normal_epsilon: f64, dist_epsilon: f64) -> Self {
        Self {
            planes: Vec::new(),
            buckets: HashMap::new(),
            normal_epsilon,
            dist_epsilon,
        }
    }

    /// Returns the number of the plane equal to `(normal, dist)`, registering
    /// it first if no such plane exists yet.
    ///
    /// The normal is normalized, near-axial normals are snapped onto their
    /// axis and near-integer distances onto the integer before the lookup.
    /// When several registered planes are within tolerance the earliest one
    /// wins.
    ///
    /// Returns `None` if the normal is zero-length or any input is not finite.
    pub fn find_or_add(&mut self, normal: Vector3<f64>, dist: f64) -> Option<PlaneNum> {
        let plane = Plane::new(normal, dist)?;
        let (normal, dist) = self.snap(plane.normal(), plane.dist());

        if let Some(num) = self.find(&normal, dist) {
            return Some(num);
        }

        let num = self.planes.len();
        self.planes.push(Plane::from_unit(normal, dist));
        self.buckets.entry(bucket_of(dist)).or_default().push(num);
        Some(num)
    }

    /// Looks up a plane without registering it.
    pub fn find(&self, normal: &Vector3<f64>, dist: f64) -> Option<PlaneNum> {
        let bucket = bucket_of(dist);
        let mut best: Option<PlaneNum> = None;
        for key in [bucket.saturating_sub(1), bucket, bucket.saturating_add(1)] {
            let Some(candidates) = self.buckets.get(&key) else {
                continue;
            };
            for &num in candidates {
                if self.plane_equal(&self.planes[num], normal, dist) {
                    best = Some(best.map_or(num, |b| b.min(num)));
                }
            }
        }
        best
    }

    /// Returns the plane registered under `num`.
    ///
    /// # Panics
    /// Panics if `num` was not returned by this set.
    #[inline]
    pub fn get(&self, num: PlaneNum) -> &Plane {
        &self.planes[num]
    }

    /// Returns all registered planes, indexed by [`PlaneNum`].
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    fn plane_equal(&self, plane: &Plane, normal: &Vector3<f64>, dist: f64) -> bool {
        let n = plane.normal();
        (n.x - normal.x).abs() < self.normal_epsilon
            && (n.y - normal.y).abs() < self.normal_epsilon
            && (n.z - normal.z).abs() < self.normal_epsilon
            && (plane.dist() - dist).abs() < self.dist_epsilon
    }

    fn snap(&self, mut normal: Vector3<f64>, dist: f64) -> (Vector3<f64>, f64) {
        for i in 0..3 {
            if (normal[i] - 1.0).abs() < self.normal_epsilon {
                normal = Vector3::zeros();
                normal[i] = 1.0;
                break;
            }
            if (normal[i] + 1.0).abs() < self.normal_epsilon {
                normal = Vector3::zeros();
                normal[i] = -1.0;
                break;
            }
        }

        let rounded = dist.round();
        let dist = if (dist - rounded).abs() < self.dist_epsilon {
            rounded
        } else {
            dist
        };
        (normal, dist)
    }
}

fn bucket_of(dist: f64) -> i64 {
    dist.abs().floor() as i64
}
