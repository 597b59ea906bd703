use rand::Rng;

use crate::sampling::uniform_sample_sphere;
use crate::vector::Vector3;

/// An emitting sphere radiating uniformly in all directions. Radiance
/// falls off with the square of the distance to the center; the extent
/// only spreads the shadow rays.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereLight {
    center: Vector3,
    radius: f32,
    intensity: Vector3,
}

impl SphereLight {
    pub fn new(center: Vector3, color: Vector3, intensity: f32, radius: f32) -> Self {
        Self {
            center,
            radius,
            intensity: color * intensity,
        }
    }

    /// A uniform point on the light's bounding sphere.
    pub fn sample(&self, rng: &mut impl Rng) -> Vector3 {
        self.center + uniform_sample_sphere(rng) * self.radius
    }

    /// Radiance arriving at `point` from this light.
    pub fn emitted(&self, point: Vector3) -> Vector3 {
        self.intensity / (self.center - point).length_squared()
    }
}
