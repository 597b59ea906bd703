//! Stackless restart traversal. A miss in a leaf that did not exhaust the
//! ray's interval re-descends from the root with the interval advanced
//! past the leaf, trading redundant descents for constant per-ray memory.

use std::mem::swap;

use crate::plane::Axis;
use crate::ray::Ray;
use crate::triray::{TriRayIntersection, find_closest};

use super::compact::CompactTree;

/// Closest intersection in `[tmin_init, tmax_init)`, or `None`.
///
/// The split axis of an inner node is not stored; it is recovered from
/// the descent depth, starting at X for the root and cycling X, Y, Z.
pub fn search_tree<'a>(
    tree: &'a CompactTree,
    ray: &Ray,
    tmin_init: f32,
    tmax_init: f32,
) -> Option<TriRayIntersection<'a>> {
    debug_assert!(ray.direction.is_finite(), "ray direction must be finite");
    debug_assert!(tmin_init <= tmax_init);

    let mut index = 0;
    let mut axis = Axis::X;
    let mut tmin = tmin_init;
    let mut tmax = tmax_init;

    loop {
        let node = tree.node(index);

        if node.is_leaf() {
            let result = find_closest(tree.leaf_triangles(node), ray, tmin, tmax);
            if result.is_some() {
                return result;
            } else if tmax == tmax_init {
                return None;
            } else {
                // restart past this leaf's slab
                tmin = tmax;
                tmax = tmax_init;
                index = 0;
                axis = Axis::X;
            }
        } else {
            let p = node.split_distance();
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let t = (p - o) / d;

            let mut near = CompactTree::left_child(index);
            let mut far = CompactTree::right_child(index);
            if d < 0.0 {
                swap(&mut near, &mut far);
            }

            if t >= tmax {
                index = near;
            } else if t <= tmin {
                index = far;
            } else {
                index = near;
                tmax = t;
            }
            axis = axis.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdtree::{CompactTree, build_linked};
    use crate::triangle::{Triangle, test_triangle};
    use crate::vector::Vector3;
    use pretty_assertions::assert_eq;

    fn gap_scene() -> Vec<Triangle> {
        vec![
            test_triangle(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.5, 1.0, 1.0),
            ),
            test_triangle(
                Vector3::new(3.0, 0.0, 0.0),
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(3.5, 1.0, 1.0),
            ),
        ]
    }

    /// Two triangles lying in the planes x = 2 and x = 4.
    fn wall_scene() -> Vec<Triangle> {
        vec![
            test_triangle(
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(2.0, 1.0, 0.0),
                Vector3::new(2.0, 0.0, 1.0),
            ),
            test_triangle(
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(4.0, 1.0, 0.0),
                Vector3::new(4.0, 0.0, 1.0),
            ),
        ]
    }

    #[test]
    fn test_ray_through_both_children_hits_nearest() {
        let triangles = gap_scene();
        let tree = CompactTree::from_linked(&build_linked(&triangles));

        // one ray into each child of the root split
        let ray = Ray::new(Vector3::new(0.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = search_tree(&tree, &ray, 0.0, f32::MAX).unwrap();
        assert_eq!(hit.t, 1.5);

        let ray = Ray::new(Vector3::new(3.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = search_tree(&tree, &ray, 0.0, f32::MAX).unwrap();
        assert_eq!(hit.t, 1.5);
    }

    #[test]
    fn test_walls_hit_from_either_direction() {
        let triangles = wall_scene();
        let tree = CompactTree::from_linked(&build_linked(&triangles));

        let forward = Ray::new(Vector3::new(0.0, 0.25, 0.25), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(search_tree(&tree, &forward, 0.0, f32::MAX).unwrap().t, 2.0);

        // approaching from between the walls forces a miss in the first
        // leaf and a restart before the near wall is found
        let backward = Ray::new(Vector3::new(3.0, 0.25, 0.25), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(search_tree(&tree, &backward, 0.0, f32::MAX).unwrap().t, 1.0);
    }

    #[test]
    fn test_interval_bounds_are_honored() {
        let triangles = gap_scene();
        let tree = CompactTree::from_linked(&build_linked(&triangles));
        let ray = Ray::new(Vector3::new(0.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));

        // the hit is at t = 1.5 and the upper bound is exclusive
        assert!(search_tree(&tree, &ray, 0.0, 1.5).is_none());
        assert!(search_tree(&tree, &ray, 2.0, f32::MAX).is_none());
        assert_eq!(search_tree(&tree, &ray, 0.0, 2.0).unwrap().t, 1.5);
    }

    #[test]
    fn test_miss_returns_none() {
        let triangles = gap_scene();
        let tree = CompactTree::from_linked(&build_linked(&triangles));
        let ray = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));

        assert!(search_tree(&tree, &ray, 0.0, f32::MAX).is_none());
    }
}
