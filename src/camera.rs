use crate::ray::Ray;
use crate::vector::{Vector3, cross};

/// Scene camera description. The field of view is in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub direction: Vector3,
    pub up: Vector3,
    pub right: Vector3,
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Vector3, target: Vector3, up: Vector3, fov: f32) -> Self {
        let direction = (target - position).to_unit();
        let up = up.to_unit();
        let right = cross(direction, up).to_unit();
        Self {
            position,
            direction,
            up,
            right,
            fov,
        }
    }
}

/// Camera specialized for emitting rays: `ray(x, y)` maps screen
/// coordinates in [0, 1]^2 to a primary ray with one vector add and two
/// scales.
#[derive(Clone, Debug, PartialEq)]
pub struct Pinhole {
    position: Vector3,
    mind: Vector3,
    dx: Vector3,
    dy: Vector3,
}

impl Pinhole {
    pub fn new(camera: &Camera, aspect_ratio: f32) -> Self {
        let fov_half = camera.fov / 2.0;

        let x = camera.up * fov_half.sin();
        let y = camera.right * fov_half.sin() * aspect_ratio;
        let z = camera.direction * fov_half.cos();

        Self {
            position: camera.position,
            mind: z - y - x,
            dx: 2.0 * y,
            dy: 2.0 * x,
        }
    }

    pub fn ray(&self, x: f32, y: f32) -> Ray {
        Ray::new(self.position, (self.mind + x * self.dx + y * self.dy).to_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    fn look_down_negative_z() -> Camera {
        Camera::new(
            Vector3::ZERO,
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            90f32.to_radians(),
        )
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = look_down_negative_z();

        assert_eq!(camera.direction, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.right, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.up, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_center_ray_follows_view_direction() {
        let pinhole = Pinhole::new(&look_down_negative_z(), 1.0);

        let ray = pinhole.ray(0.5, 0.5);

        assert_eq!(ray.origin, Vector3::ZERO);
        assert_close(ray.direction, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_corner_rays_are_symmetric() {
        let pinhole = Pinhole::new(&look_down_negative_z(), 1.0);

        let lower_left = pinhole.ray(0.0, 0.0).direction;
        let upper_right = pinhole.ray(1.0, 1.0).direction;

        assert_close(
            Vector3::new(lower_left.x, lower_left.y, 0.0),
            -Vector3::new(upper_right.x, upper_right.y, 0.0),
        );
        assert_eq!(lower_left.z, upper_right.z);
        // 90 degree field of view spans 45 degrees to each side
        assert!((lower_left.x.abs() / lower_left.z.abs() - 1.0).abs() < 1e-5);
    }
}
