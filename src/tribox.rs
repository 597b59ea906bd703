//! Triangle/box overlap after Akenine-Moller's separating axis test: the
//! three box axes, the triangle normal, and the nine cross products of box
//! axes with triangle edges. All bounds are inclusive, so a triangle whose
//! projection collapses to a single point on some axis still overlaps a box
//! that contains that point.

use crate::aabb::Aabb;
use crate::plane::Axis;
use crate::vector::{Vector3, cross, dot};

fn min3(a: f32, b: f32, c: f32) -> f32 {
    a.min(b).min(c)
}

fn max3(a: f32, b: f32, c: f32) -> f32 {
    a.max(b).max(c)
}

/// One cross-product axis: the triangle projects to [min(pa, pb), max(pa, pb)]
/// and the box to [-rad, rad].
fn axis_separates(pa: f32, pb: f32, rad: f32) -> bool {
    pa.min(pb) > rad || pa.max(pb) < -rad
}

fn plane_box_overlap(normal: Vector3, vert: Vector3, half: Vector3) -> bool {
    let mut vmin = Vector3::ZERO;
    let mut vmax = Vector3::ZERO;
    for axis in Axis::ALL {
        let v = vert[axis];
        if normal[axis] > 0.0 {
            vmin[axis] = -half[axis] - v;
            vmax[axis] = half[axis] - v;
        } else {
            vmin[axis] = half[axis] - v;
            vmax[axis] = -half[axis] - v;
        }
    }

    dot(normal, vmin) <= 0.0 && dot(normal, vmax) >= 0.0
}

pub fn tri_box_overlap(aabb: &Aabb, v0: Vector3, v1: Vector3, v2: Vector3) -> bool {
    // work relative to the box center
    let half = aabb.half();
    let v0 = v0 - aabb.center();
    let v1 = v1 - aabb.center();
    let v2 = v2 - aabb.center();

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    // the nine cross products of box axes and triangle edges; both edge
    // endpoints project to the same point on such an axis, so testing one
    // endpoint and the opposite vertex covers the whole triangle
    for (e, a, b) in [(e0, v0, v2), (e1, v0, v2), (e2, v0, v1)] {
        let f = Vector3::new(e.x.abs(), e.y.abs(), e.z.abs());

        // X x e
        let pa = e.z * a.y - e.y * a.z;
        let pb = e.z * b.y - e.y * b.z;
        if axis_separates(pa, pb, f.z * half.y + f.y * half.z) {
            return false;
        }

        // Y x e
        let pa = -e.z * a.x + e.x * a.z;
        let pb = -e.z * b.x + e.x * b.z;
        if axis_separates(pa, pb, f.z * half.x + f.x * half.z) {
            return false;
        }

        // Z x e
        let pa = e.y * a.x - e.x * a.y;
        let pb = e.y * b.x - e.x * b.y;
        if axis_separates(pa, pb, f.y * half.x + f.x * half.y) {
            return false;
        }
    }

    // the box axes: equivalent to testing the triangle's own AABB
    for axis in Axis::ALL {
        let min = min3(v0[axis], v1[axis], v2[axis]);
        let max = max3(v0[axis], v1[axis], v2[axis]);
        if min > half[axis] || max < -half[axis] {
            return false;
        }
    }

    // the triangle normal
    plane_box_overlap(cross(e0, e1), v0, half)
}
