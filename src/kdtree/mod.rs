//! SAH kd-tree over the scene's triangles.
//!
//! Construction produces a pointer-linked tree which is immediately
//! flattened into a compact implicit-heap array; rendering only ever
//! touches the compact form.

use std::time::Instant;

use crate::ray::Ray;
use crate::triangle::Triangle;
use crate::triray::TriRayIntersection;

mod build;
mod compact;
mod partition;
mod traverse;

pub use build::{
    COST_EMPTY_FACTOR, COST_INTERSECT, COST_TRAVERSE, KdNode, MAX_DEPTH, Side, build_linked,
};
pub use compact::{CompactNode, CompactTree};
pub use partition::{KdBox, KdSplit, split_box};

/// Build the kd-tree for a triangle set and flatten it for traversal.
pub fn build(triangles: &[Triangle]) -> CompactTree {
    let start = Instant::now();
    let linked = build_linked(triangles);
    let tree = CompactTree::from_linked(&linked);

    tracing::debug!(
        triangles = triangles.len(),
        nodes = tree.node_count(),
        leaves = tree.leaf_count(),
        elapsed = ?start.elapsed(),
        "kd-tree built"
    );

    tree
}

impl CompactTree {
    /// Closest triangle intersection along `ray` within `[tmin, tmax)`.
    pub fn closest_hit(&self, ray: &Ray, tmin: f32, tmax: f32) -> Option<TriRayIntersection<'_>> {
        traverse::search_tree(self, ray, tmin, tmax)
    }

    /// Whether anything at all blocks `ray` within `[tmin, tmax)`.
    pub fn any_hit(&self, ray: &Ray, tmin: f32, tmax: f32) -> bool {
        self.closest_hit(ray, tmin, tmax).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::test_triangle;
    use crate::triray::find_closest;
    use crate::vector::Vector3;
    use pretty_assertions::assert_eq;

    /// An axis-aligned unit cube centered at the origin, two triangles per
    /// face, with shading normals pointing outward.
    pub(crate) fn unit_cube() -> Vec<Triangle> {
        let mut triangles = Vec::new();
        // corners at +-0.5; faces as (origin corner, edge a, edge b) so
        // that a x b points outward
        let faces = [
            // +z
            ([-0.5, -0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            // -z
            ([0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            // +x
            ([0.5, -0.5, 0.5], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            // -x
            ([-0.5, -0.5, -0.5], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            // +y
            ([-0.5, 0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            // -y
            ([-0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        for (q, a, b) in faces {
            let q = Vector3::new(q[0], q[1], q[2]);
            let a = Vector3::new(a[0], a[1], a[2]);
            let b = Vector3::new(b[0], b[1], b[2]);
            triangles.push(test_triangle(q, q + a, q + a + b));
            triangles.push(test_triangle(q, q + a + b, q + b));
        }
        triangles
    }

    #[test]
    fn test_cube_front_face_hit() {
        let triangles = unit_cube();
        let tree = build(&triangles);
        let ray = Ray::new(Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));

        let hit = tree.closest_hit(&ray, 0.0, f32::MAX).unwrap();

        assert_eq!(hit.t, 1.5);
        assert_eq!(hit.normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_tree_agrees_with_brute_force() {
        let triangles = unit_cube();
        let tree = build(&triangles);

        let origins = [
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(2.0, 0.3, 0.1),
            Vector3::new(-1.5, -1.5, -1.5),
            Vector3::new(0.2, 3.0, -0.4),
            Vector3::new(0.0, 0.0, 0.0),
        ];
        let directions = [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(-1.0, -0.15, -0.05).to_unit(),
            Vector3::new(1.0, 1.0, 1.0).to_unit(),
            Vector3::new(-0.1, -1.0, 0.2).to_unit(),
            Vector3::new(0.3, -0.4, 0.8).to_unit(),
        ];

        for origin in origins {
            for direction in directions {
                let ray = Ray::new(origin, direction);
                let expected = find_closest(&triangles, &ray, 0.0, f32::MAX);
                let actual = tree.closest_hit(&ray, 0.0, f32::MAX);

                // rays through edges and corners hit several triangles at
                // the same t, and the two searches may pick different
                // ones, so only the distance is compared
                assert_eq!(
                    expected.as_ref().map(|hit| hit.t),
                    actual.as_ref().map(|hit| hit.t),
                );
            }
        }
    }

    #[test]
    fn test_traversal_is_idempotent() {
        let triangles = unit_cube();
        let tree = build(&triangles);
        let ray = Ray::new(
            Vector3::new(1.3, 0.8, 2.0),
            Vector3::new(-0.5, -0.3, -0.9).to_unit(),
        );

        let first = tree.closest_hit(&ray, 0.0, f32::MAX).map(|h| (h.t, h.u, h.v));
        let second = tree.closest_hit(&ray, 0.0, f32::MAX).map(|h| (h.t, h.u, h.v));

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_triangle_is_lost() {
        let triangles = unit_cube();
        let tree = build(&triangles);

        for triangle in &triangles {
            assert!(
                tree.leaves().any(|leaf| leaf.contains(triangle)),
                "triangle missing from every leaf"
            );
        }
    }

    #[test]
    fn test_any_hit_for_occlusion() {
        let triangles = unit_cube();
        let tree = build(&triangles);

        let blocked = Ray::new(Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -4.0));
        let free = Ray::new(Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, 4.0));

        // parametrized to [0, 1] the way shadow rays are
        assert!(tree.any_hit(&blocked, 0.0, 1.0));
        assert!(!tree.any_hit(&free, 0.0, 1.0));
    }
}
