use crate::plane::Aap;
use crate::triangle::Triangle;
use crate::vector::Vector3;

/// Axis-aligned box stored as center + half-extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    center: Vector3,
    half: Vector3,
}

/// The two boxes produced by cutting a box with an axis-aligned plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AabbSplit {
    pub left: Aabb,
    pub right: Aabb,
}

impl Aabb {
    pub fn new(center: Vector3, half: Vector3) -> Self {
        Self { center, half }
    }

    pub fn from_extents(min: Vector3, max: Vector3) -> Self {
        let half = (max - min) / 2.0;
        Self {
            center: min + half,
            half,
        }
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn half(&self) -> Vector3 {
        self.half
    }

    pub fn min(&self) -> Vector3 {
        self.center - self.half
    }

    pub fn max(&self) -> Vector3 {
        self.center + self.half
    }

    pub fn surface_area(&self) -> f32 {
        8.0 * (self.half.x * self.half.y + self.half.x * self.half.z + self.half.y * self.half.z)
    }

    /// Cut along `plane`, producing the `[min, d]` and `[d, max]` boxes on
    /// the plane's axis. The plane must lie within the box.
    pub fn split(&self, plane: Aap) -> AabbSplit {
        let axis = plane.axis;
        let left_half_axis = (plane.distance - self.min()[axis]) / 2.0;
        let right_half_axis = (self.max()[axis] - plane.distance) / 2.0;
        assert!(left_half_axis >= 0.0 && right_half_axis >= 0.0);

        let mut left = *self;
        left.center[axis] = plane.distance - left_half_axis;
        left.half[axis] = left_half_axis;

        let mut right = *self;
        right.center[axis] = plane.distance + right_half_axis;
        right.half[axis] = right_half_axis;

        AabbSplit { left, right }
    }
}

/// The tightest box enclosing all of `triangles`; a point at the origin
/// when the slice is empty.
pub fn find_bounding(triangles: &[Triangle]) -> Aabb {
    let Some(first) = triangles.first() else {
        return Aabb::new(Vector3::ZERO, Vector3::ZERO);
    };

    let mut min = first.min();
    let mut max = first.max();
    for triangle in &triangles[1..] {
        min = min.min(triangle.min());
        max = max.max(triangle.max());
    }

    Aabb::from_extents(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Axis;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_surface_area_of_unit_cube() {
        let aabb = Aabb::new(Vector3::ZERO, Vector3::new(0.5, 0.5, 0.5));

        assert_eq!(aabb.surface_area(), 6.0);
    }

    #[test]
    fn test_extents_round_trip() {
        let aabb = Aabb::from_extents(Vector3::new(-1.0, 0.0, 2.0), Vector3::new(1.0, 4.0, 3.0));

        assert_eq!(aabb.min(), Vector3::new(-1.0, 0.0, 2.0));
        assert_eq!(aabb.max(), Vector3::new(1.0, 4.0, 3.0));
        assert_eq!(aabb.center(), Vector3::new(0.0, 2.0, 2.5));
    }

    #[test]
    fn test_split_partitions_axis() {
        let aabb = Aabb::from_extents(Vector3::ZERO, Vector3::new(4.0, 1.0, 1.0));

        let split = aabb.split(Aap::new(Axis::X, 1.0));

        assert_eq!(split.left.min(), Vector3::ZERO);
        assert_eq!(split.left.max(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(split.right.min(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(split.right.max(), Vector3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn test_split_at_boundary_leaves_empty_side() {
        let aabb = Aabb::from_extents(Vector3::ZERO, Vector3::ONE);

        let split = aabb.split(Aap::new(Axis::Z, 0.0));

        assert_eq!(split.left.half().z, 0.0);
        assert_eq!(split.right, aabb);
    }
}
