use crate::material::MaterialId;
use crate::plane::Aap;
use crate::vector::{Vector2, Vector3};

/// A mesh triangle: positions, shading normals and texture coordinates at
/// the three corners, plus the handle of the material it is shaded with.
/// Immutable once the scene has been assembled.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vector3,
    pub v1: Vector3,
    pub v2: Vector3,
    pub n0: Vector3,
    pub n1: Vector3,
    pub n2: Vector3,
    pub uv0: Vector2,
    pub uv1: Vector2,
    pub uv2: Vector2,
    pub material: MaterialId,
}

impl Triangle {
    pub fn min(&self) -> Vector3 {
        self.v0.min(self.v1).min(self.v2)
    }

    pub fn max(&self) -> Vector3 {
        self.v0.max(self.v1).max(self.v2)
    }

    /// True when all three vertices lie exactly in `plane`.
    pub fn in_plane(&self, plane: Aap) -> bool {
        self.v0[plane.axis] == plane.distance
            && self.v1[plane.axis] == plane.distance
            && self.v2[plane.axis] == plane.distance
    }

    /// Shading normal interpolated at barycentric (u, v), where u weights
    /// the second corner and v the third.
    pub fn shading_normal(&self, u: f32, v: f32) -> Vector3 {
        ((1.0 - (u + v)) * self.n0 + u * self.n1 + v * self.n2).to_unit()
    }
}

#[cfg(test)]
pub(crate) fn test_triangle(v0: Vector3, v1: Vector3, v2: Vector3) -> Triangle {
    use crate::vector::cross;

    let normal = cross(v1 - v0, v2 - v0).to_unit();
    Triangle {
        v0,
        v1,
        v2,
        n0: normal,
        n1: normal,
        n2: normal,
        uv0: Vector2::default(),
        uv1: Vector2::default(),
        uv2: Vector2::default(),
        material: MaterialId::default(),
    }
}
