//! Partitioning brushes by a splitting plane.

use std::sync::Arc;

use crate::brush::clip_to_brush;
use crate::{
    ChildSide, Classification, CompileBrush, CompileSide, Plane, PlaneNum, PlaneSet, Winding,
    CLASSIFY_EPSILON,
};

/// Brushes on each side of a splitting plane.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub front: Vec<Arc<CompileBrush>>,
    pub back: Vec<Arc<CompileBrush>>,
}

/// Distributes `brushes` to the two sides of plane `plane_num`.
///
/// Brushes entirely on one side are passed through as the same `Arc`.
/// Brushes on the plane go to the front. Brushes crossing the plane are cut
/// into two new fragments.
pub fn partition_brushes(
    brushes: &[Arc<CompileBrush>],
    plane_num: PlaneNum,
    planes: &PlaneSet,
) -> Partition {
    partition_brushes_with_epsilon(brushes, plane_num, planes, CLASSIFY_EPSILON)
}

/// [`partition_brushes`] with a custom classification tolerance.
pub fn partition_brushes_with_epsilon(
    brushes: &[Arc<CompileBrush>],
    plane_num: PlaneNum,
    planes: &PlaneSet,
    epsilon: f64,
) -> Partition {
    let mut partition = Partition::default();
    for brush in brushes {
        let (front, back) = split_brush(brush, plane_num, planes, epsilon);
        partition.front.extend(front);
        partition.back.extend(back);
    }
    partition
}

/// Cuts a brush by plane `plane_num`.
///
/// Returns `(front, back)`. A brush that does not cross the plane is
/// returned unchanged on its side. A crossing brush yields two fragments,
/// each closed by a cap side on the splitting plane. If one fragment would
/// be too thin to hold a volume the whole brush goes to the other side.
pub fn split_brush(
    brush: &Arc<CompileBrush>,
    plane_num: PlaneNum,
    planes: &PlaneSet,
    epsilon: f64,
) -> (Option<Arc<CompileBrush>>, Option<Arc<CompileBrush>>) {
    let plane = planes.get(plane_num);
    match brush.classify(plane, epsilon) {
        Classification::Front | Classification::Coplanar => return (Some(brush.clone()), None),
        Classification::Back => return (None, Some(brush.clone())),
        Classification::Spanning => {}
    }

    let side_planes: Vec<Plane> = brush.sides().iter().map(|s| s.outward_plane(planes)).collect();
    let Some(cap) = clip_to_brush(Winding::base_for_plane(plane), &side_planes, None) else {
        return whole_to_side(brush, mostly_on_side(brush, plane));
    };

    let mut front_sides = Vec::with_capacity(brush.sides().len() + 1);
    let mut back_sides = Vec::with_capacity(brush.sides().len() + 1);

    for (side, outward) in brush.sides().iter().zip(&side_planes) {
        let Some(winding) = side.winding.as_ref() else {
            front_sides.push(side.clone());
            back_sides.push(side.clone());
            continue;
        };

        let (front, back) = match winding.classify(plane, epsilon) {
            Classification::Coplanar => {
                // a face on the plane belongs to the fragment it bounds
                if outward.normal().dot(&plane.normal()) > 0.0 {
                    (None, Some(winding.clone()))
                } else {
                    (Some(winding.clone()), None)
                }
            }
            _ => winding.split(plane, epsilon),
        };

        if let Some(w) = front.filter(|w| !w.is_tiny()) {
            front_sides.push(CompileSide {
                winding: Some(w),
                ..side.clone()
            });
        }
        if let Some(w) = back.filter(|w| !w.is_tiny()) {
            back_sides.push(CompileSide {
                winding: Some(w),
                ..side.clone()
            });
        }
    }

    front_sides.push(CompileSide {
        plane_num,
        facing_out: false,
        tex_info: None,
        winding: Some(cap.reversed()),
    });
    back_sides.push(CompileSide {
        plane_num,
        facing_out: true,
        tex_info: None,
        winding: Some(cap),
    });

    let front = CompileBrush::from_parts(brush.brush_num(), front_sides, brush.contents());
    let back = CompileBrush::from_parts(brush.brush_num(), back_sides, brush.contents());

    match (front, back) {
        (Some(front), Some(back)) => (Some(Arc::new(front)), Some(Arc::new(back))),
        (Some(_), None) => whole_to_side(brush, ChildSide::Front),
        (None, Some(_)) => whole_to_side(brush, ChildSide::Back),
        (None, None) => whole_to_side(brush, mostly_on_side(brush, plane)),
    }
}

fn whole_to_side(
    brush: &Arc<CompileBrush>,
    side: ChildSide,
) -> (Option<Arc<CompileBrush>>, Option<Arc<CompileBrush>>) {
    match side {
        ChildSide::Front => (Some(brush.clone()), None),
        ChildSide::Back => (None, Some(brush.clone())),
    }
}

/// Side of the plane holding the point of the brush furthest from it.
fn mostly_on_side(brush: &CompileBrush, plane: &Plane) -> ChildSide {
    let mut max = 0.0;
    let mut side = ChildSide::Front;
    for point in brush.points() {
        let d = plane.signed_distance(point);
        if d > max {
            max = d;
            side = ChildSide::Front;
        }
        if -d > max {
            max = -d;
            side = ChildSide::Back;
        }
    }
    side
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{cube, solid_box};
    use crate::Contents;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn x_plane(planes: &mut PlaneSet, dist: f64) -> PlaneNum {
        planes.find_or_add(Vector3::new(1.0, 0.0, 0.0), dist).unwrap()
    }

    #[test]
    fn partitions_disjoint_brushes_by_reference() {
        let mut planes = PlaneSet::new();
        let a = cube(&mut planes, 0, [-100.0, 0.0, 0.0], 64.0);
        let b = cube(&mut planes, 1, [100.0, 0.0, 0.0], 64.0);
        let plane = x_plane(&mut planes, 0.0);

        let Partition { front, back } = partition_brushes(&[a.clone(), b.clone()], plane, &planes);

        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(Arc::ptr_eq(&front[0], &b));
        assert!(Arc::ptr_eq(&back[0], &a));
    }

    #[test]
    fn splits_spanning_box_at_plane() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0, [0.0, 0.0, 0.0], 128.0);
        let plane = x_plane(&mut planes, 0.0);
        let planes_before = planes.len();

        let Partition { front, back } = partition_brushes(&[brush.clone()], plane, &planes);

        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(front[0].bounds().mins.x >= -0.001);
        assert!(back[0].bounds().maxs.x <= 0.001);
        assert_relative_eq!(front[0].bounds().maxs.x, 64.0);
        assert_relative_eq!(back[0].bounds().mins.x, -64.0);
        assert_eq!(planes.len(), planes_before);
    }

    #[test]
    fn fragments_keep_identity_contents_and_get_caps() {
        let mut planes = PlaneSet::new();
        let brush = solid_box(&mut planes, 7, [0.0, 0.0, 0.0], [64.0; 3], Contents::WATER);
        let plane = x_plane(&mut planes, 10.0);

        let (front, back) = split_brush(&brush, plane, &planes, CLASSIFY_EPSILON);
        let front = front.unwrap();
        let back = back.unwrap();

        for fragment in [&front, &back] {
            assert_eq!(fragment.brush_num(), 7);
            assert_eq!(fragment.contents(), Contents::WATER);
            assert_eq!(fragment.sides().len(), 6);
        }

        let front_cap = front.sides().iter().find(|s| s.plane_num == plane).unwrap();
        let back_cap = back.sides().iter().find(|s| s.plane_num == plane).unwrap();
        assert!(!front_cap.facing_out);
        assert!(back_cap.facing_out);
        assert!(front_cap.tex_info.is_none());

        // the cap's outward plane points away from its fragment
        let outward = front_cap.outward_plane(&planes);
        assert!(outward.signed_distance(&Point3::new(20.0, 0.0, 0.0)) < 0.0);

        assert_eq!(front.bounds().mins.x, 10.0);
        assert_eq!(back.bounds().maxs.x, 10.0);
        assert_eq!(front.bounds().maxs.x, 32.0);
    }

    #[test]
    fn input_brush_is_not_modified() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0, [0.0, 0.0, 0.0], 64.0);
        let snapshot = (*brush).clone();
        let plane = x_plane(&mut planes, 0.0);

        let _ = partition_brushes(&[brush.clone()], plane, &planes);
        assert_eq!(*brush, snapshot);
    }

    #[test]
    fn touching_brush_is_not_split() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0, [32.0, 0.0, 0.0], 64.0);
        let plane = x_plane(&mut planes, 0.0);

        let (front, back) = split_brush(&brush, plane, &planes, CLASSIFY_EPSILON);
        assert!(Arc::ptr_eq(&front.unwrap(), &brush));
        assert!(back.is_none());
    }

    #[test]
    fn sliver_goes_whole_to_the_bigger_side() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0, [0.0, 0.0, 0.0], 64.0);
        // 0.005 inside the +x face: within epsilon of the face, so no cut
        let plane = x_plane(&mut planes, 31.995);

        let (front, back) = split_brush(&brush, plane, &planes, CLASSIFY_EPSILON);
        assert!(front.is_none());
        assert!(Arc::ptr_eq(&back.unwrap(), &brush));
    }

    #[test]
    fn diagonal_split_produces_wedges() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0, [0.0, 0.0, 0.0], 64.0);
        let plane = planes.find_or_add(Vector3::new(1.0, 1.0, 0.0), 0.0).unwrap();

        let (front, back) = split_brush(&brush, plane, &planes, CLASSIFY_EPSILON);
        let front = front.unwrap();
        let back = back.unwrap();

        // +x,+y faces on the front wedge, -x,-y on the back, and a cap each
        assert_eq!(front.sides().len(), 5);
        assert_eq!(back.sides().len(), 5);
        let diagonal = planes.get(plane);
        assert!(front.points().all(|p| diagonal.signed_distance(p) > -0.001));
        assert!(back.points().all(|p| diagonal.signed_distance(p) < 0.001));
    }
}
