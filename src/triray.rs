//! Moller-Trumbore triangle/ray intersection and closest-hit search over a
//! triangle list.

use crate::ray::Ray;
use crate::triangle::Triangle;
use crate::vector::{Vector3, cross, dot};

/// Rays with a smaller determinant than this against a triangle's edge
/// basis count as parallel and miss.
const EPSILON: f32 = 1e-5;

#[derive(Clone, Debug)]
pub struct TriRayIntersection<'t> {
    pub triangle: &'t Triangle,
    /// Ray parameter of the hit point.
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

impl TriRayIntersection<'_> {
    pub fn position(&self, ray: &Ray) -> Vector3 {
        ray.param(self.t)
    }

    pub fn normal(&self) -> Vector3 {
        self.triangle.shading_normal(self.u, self.v)
    }
}

/// Intersect one triangle. Hits on both faces are reported; rays parallel
/// to the triangle plane are not.
pub fn intersect<'t>(triangle: &'t Triangle, ray: &Ray) -> Option<TriRayIntersection<'t>> {
    let e1 = triangle.v1 - triangle.v0;
    let e2 = triangle.v2 - triangle.v0;
    let q = cross(ray.direction, e2);

    let a = dot(e1, q);
    if a > -EPSILON && a < EPSILON {
        return None;
    }

    let s = ray.origin - triangle.v0;
    let f = 1.0 / a;
    let u = f * dot(s, q);
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let r = cross(s, e1);
    let v = f * dot(ray.direction, r);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * dot(e2, r);
    Some(TriRayIntersection { triangle, t, u, v })
}

/// The hit with minimum `t` in the half-open range `[tmin, tmax)`, if any.
pub fn find_closest<'t>(
    triangles: &'t [Triangle],
    ray: &Ray,
    tmin: f32,
    tmax: f32,
) -> Option<TriRayIntersection<'t>> {
    let mut tmax = tmax;
    let mut best = None;

    for triangle in triangles {
        if let Some(hit) = intersect(triangle, ray)
            && hit.t >= tmin
            && hit.t < tmax
        {
            tmax = hit.t;
            best = Some(hit);
        }
    }

    best
}
