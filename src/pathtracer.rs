//! The iterative Monte-Carlo path integrator: direct light via one shadow
//! ray per light at every bounce, BRDF-importance-sampled continuation,
//! fixed-depth termination.

use rand::Rng;

use crate::camera::Pinhole;
use crate::light::SphereLight;
use crate::material::Material;
use crate::ray::Ray;
use crate::samplebuffer::SampleBuffer;
use crate::sampling::uniform_sample_square;
use crate::scene::Scene;
use crate::vector::{Vector3, dot};

pub const MAX_BOUNCES: u32 = 16;

/// Shared by the self-intersection offset, the degenerate-pdf cutoff and
/// the transport cutoff.
const EPSILON: f32 = 1e-5;

pub struct Pathtracer<'s> {
    pub scene: &'s Scene,
    pub max_bounces: u32,
    /// Radiance assigned to rays that leave the scene.
    pub environment: Vector3,
}

impl<'s> Pathtracer<'s> {
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            max_bounces: MAX_BOUNCES,
            environment: Vector3::new(0.8, 0.8, 0.8),
        }
    }

    fn environment_contribution(&self, _ray: &Ray) -> Vector3 {
        self.environment
    }

    /// One next-event-estimation sample: shoot a shadow ray at a point on
    /// the light and, if unblocked, weigh the emitted radiance by the
    /// BRDF and the cosine term.
    fn light_contribution(
        &self,
        material: &Material,
        target: Vector3,
        offset_up: Vector3,
        wi: Vector3,
        n: Vector3,
        light: &SphereLight,
        rng: &mut impl Rng,
    ) -> Vector3 {
        let source = light.sample(rng);
        let direction = source - target;

        let shadow_ray = Ray::new(offset_up, direction);
        if self.scene.any_intersect(&shadow_ray, 0.0, 1.0) {
            return Vector3::ZERO;
        }

        let wo = direction.to_unit();
        let radiance = light.emitted(target);
        material.brdf(wi, wo, n) * radiance * dot(wo, n).abs()
    }

    /// Estimate the radiance arriving along `ray`.
    pub fn trace(&self, ray: Ray, rng: &mut impl Rng) -> Vector3 {
        let mut radiance = Vector3::ZERO;
        let mut transport = Vector3::ONE;
        let mut ray = ray;
        let mut bounce = 0;

        loop {
            if bounce >= self.max_bounces {
                return radiance;
            }

            let Some(intersection) = self.scene.intersect(&ray, 0.0, f32::MAX) else {
                return radiance + transport * self.environment_contribution(&ray);
            };

            let wi = -ray.direction;
            let point = intersection.position(&ray);
            let n = intersection.normal();
            let material = self.scene.material(intersection.triangle.material);

            // hop off the surface to avoid re-intersecting it
            let offset = EPSILON * n;
            let offset_up = point + offset;
            let offset_down = point - offset;

            let mut sum_lights = Vector3::ZERO;
            for light in self.scene.lights() {
                sum_lights +=
                    self.light_contribution(material, point, offset_up, wi, n, light, rng);
            }
            radiance += transport * sum_lights;

            let sample = material.sample_brdf(wi, n, rng);
            if sample.pdf < EPSILON {
                return radiance;
            }

            let cosine = dot(sample.wo, n).abs();
            transport = transport * sample.brdf * (cosine / sample.pdf);
            if transport.length_squared() < EPSILON * EPSILON {
                return radiance;
            }

            let origin = if dot(sample.wo, n) >= 0.0 {
                offset_up
            } else {
                offset_down
            };
            ray = Ray::new(origin, sample.wo);
            bounce += 1;
        }
    }

    /// Accumulate one jittered sample for every pixel of `buffer`.
    pub fn render(&self, pinhole: &Pinhole, buffer: &mut SampleBuffer, rng: &mut impl Rng) {
        let width = buffer.width() as f32;
        let height = buffer.height() as f32;

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let jitter = uniform_sample_square(rng);
                let sx = (x as f32 + jitter.x) / width;
                let sy = (y as f32 + jitter.y) / height;

                buffer.add(x, y, self.trace(pinhole.ray(sx, sy), rng));
            }
        }

        buffer.inc();
    }
}
