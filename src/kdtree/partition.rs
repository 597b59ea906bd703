use crate::aabb::{Aabb, AabbSplit};
use crate::plane::Aap;
use crate::triangle::Triangle;
use crate::tribox::tri_box_overlap;

/// A box and the triangles overlapping it, the unit of work during build.
#[derive(Clone, Debug)]
pub struct KdBox<'t> {
    pub boundary: Aabb,
    pub triangles: Vec<&'t Triangle>,
}

#[derive(Debug)]
pub struct KdSplit<'t> {
    pub plane: Aap,
    pub left: KdBox<'t>,
    pub right: KdBox<'t>,
}

/// Split a box and distribute its triangles over the two children.
///
/// A triangle lying entirely in the split plane goes to both children:
/// it sits on both child boundaries, and the compact node will store the
/// plane with its last mantissa bit stolen, so either child's slab may
/// end up the one containing the geometry. Every other triangle is
/// classified by the triangle/box overlap test against the child boxes,
/// gated on which side of the plane its extent actually reaches so a
/// triangle merely touching the plane is not duplicated into the child
/// it only grazes. A triangle may land in both children but never in
/// neither.
pub fn split_box<'t>(parent: &KdBox<'t>, plane: Aap) -> KdSplit<'t> {
    let AabbSplit { left, right } = parent.boundary.split(plane);

    let mut left_triangles = Vec::with_capacity(parent.triangles.len());
    let mut right_triangles = Vec::with_capacity(parent.triangles.len());

    for &triangle in &parent.triangles {
        if triangle.in_plane(plane) {
            left_triangles.push(triangle);
            right_triangles.push(triangle);
            continue;
        }

        let in_left = triangle.min()[plane.axis] < plane.distance
            && tri_box_overlap(&left, triangle.v0, triangle.v1, triangle.v2);
        let in_right = triangle.max()[plane.axis] > plane.distance
            && tri_box_overlap(&right, triangle.v0, triangle.v1, triangle.v2);
        assert!(in_left || in_right, "partition dropped a triangle");

        if in_left {
            left_triangles.push(triangle);
        }
        if in_right {
            right_triangles.push(triangle);
        }
    }

    KdSplit {
        plane,
        left: KdBox {
            boundary: left,
            triangles: left_triangles,
        },
        right: KdBox {
            boundary: right,
            triangles: right_triangles,
        },
    }
}
