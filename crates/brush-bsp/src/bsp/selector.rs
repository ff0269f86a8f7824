//! Splitting plane selection for BSP tree construction.
//!
//! Every side plane of every brush in the current set is a candidate. The
//! choice trades the number of brushes a plane cuts against how evenly it
//! divides the set, and is fully determined by the order of the brushes and
//! their sides.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Classification, CompileBrush, PlaneNum, PlaneSet, CLASSIFY_EPSILON};

/// Planes already split on along the path from the root to the current node.
///
/// Each child receives its own copy extended with the parent's plane, so
/// siblings never see each other's additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedPlanes {
    planes: HashSet<PlaneNum>,
}

impl UsedPlanes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, plane_num: PlaneNum) -> bool {
        self.planes.contains(&plane_num)
    }

    /// Returns a copy of the set with `plane_num` added.
    pub fn with(&self, plane_num: PlaneNum) -> Self {
        let mut planes = self.planes.clone();
        planes.insert(plane_num);
        Self { planes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

impl FromIterator<PlaneNum> for UsedPlanes {
    fn from_iter<I: IntoIterator<Item = PlaneNum>>(iter: I) -> Self {
        Self {
            planes: iter.into_iter().collect(),
        }
    }
}

/// A scored splitting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCandidate {
    pub plane_num: PlaneNum,
    /// Higher is better.
    pub score: i64,
    /// Brushes ending up in front, including both halves of split brushes
    /// and brushes lying on the plane.
    pub front_count: usize,
    /// Brushes ending up behind, including both halves of split brushes.
    pub back_count: usize,
    /// Brushes the plane cuts.
    pub split_count: usize,
    pub axial: bool,
}

/// Strategy for choosing the plane a node splits on.
pub trait SplitSelector {
    /// Selects a plane from the sides of `brushes`, skipping `used`.
    ///
    /// Returns `None` only if `brushes` is empty or every side plane is used.
    fn select(
        &self,
        brushes: &[Arc<CompileBrush>],
        planes: &PlaneSet,
        used: &UsedPlanes,
    ) -> Option<SplitCandidate>;
}

/// Scores each candidate as `-(splits * penalty) - balance * balance_weight`.
///
/// The effective split penalty is at least one more than the worst possible
/// balance term, so a plane that cuts nothing always beats one that cuts.
/// Among equal scores the first candidate wins unless `prefer_axial` lets a
/// later axial plane replace a non-axial one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSelector {
    pub split_penalty: i64,
    pub balance_weight: i64,
    pub prefer_axial: bool,
    pub epsilon: f64,
}

impl Default for ScoredSelector {
    fn default() -> Self {
        Self {
            split_penalty: 8,
            balance_weight: 1,
            prefer_axial: true,
            epsilon: CLASSIFY_EPSILON,
        }
    }
}

impl ScoredSelector {
    /// Scores a single plane against `brushes`.
    pub fn evaluate(
        &self,
        brushes: &[Arc<CompileBrush>],
        plane_num: PlaneNum,
        planes: &PlaneSet,
    ) -> SplitCandidate {
        let plane = planes.get(plane_num);

        let mut front: usize = 0;
        let mut back: usize = 0;
        let mut split: usize = 0;
        for brush in brushes {
            match brush.classify(plane, self.epsilon) {
                Classification::Front | Classification::Coplanar => front += 1,
                Classification::Back => back += 1,
                Classification::Spanning => split += 1,
            }
        }

        let front_count = front + split;
        let back_count = back + split;
        let balance = front_count.abs_diff(back_count) as i64;
        let score = -(split as i64 * self.effective_penalty(brushes.len())) - balance * self.balance_weight;

        SplitCandidate {
            plane_num,
            score,
            front_count,
            back_count,
            split_count: split,
            axial: plane.is_axial(),
        }
    }

    fn effective_penalty(&self, brush_count: usize) -> i64 {
        self.split_penalty
            .max(brush_count as i64 * self.balance_weight.max(0) + 1)
    }

    fn is_better(&self, candidate: &SplitCandidate, best: &SplitCandidate) -> bool {
        candidate.score > best.score
            || (self.prefer_axial
                && candidate.score == best.score
                && candidate.axial
                && !best.axial)
    }
}

impl SplitSelector for ScoredSelector {
    fn select(
        &self,
        brushes: &[Arc<CompileBrush>],
        planes: &PlaneSet,
        used: &UsedPlanes,
    ) -> Option<SplitCandidate> {
        let mut best: Option<SplitCandidate> = None;
        let mut tested = HashSet::new();

        for brush in brushes {
            for side in brush.sides() {
                if side.winding.is_none() || used.contains(side.plane_num) {
                    continue;
                }
                if !tested.insert(side.plane_num) {
                    continue;
                }

                let candidate = self.evaluate(brushes, side.plane_num, planes);
                if best.as_ref().is_none_or(|b| self.is_better(&candidate, b)) {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

/// Selects a splitting plane with the default [`ScoredSelector`].
pub fn select_split_plane(
    brushes: &[Arc<CompileBrush>],
    planes: &PlaneSet,
    used: &UsedPlanes,
) -> Option<SplitCandidate> {
    ScoredSelector::default().select(brushes, planes, used)
}
