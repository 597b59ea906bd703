//! Monte-Carlo sampling primitives. The engine is whatever `Rng` the
//! caller owns; the functions only specify the distributions.

use std::f32::consts::{FRAC_PI_4, PI};

use rand::Rng;

use crate::vector::{Vector2, Vector3};

pub fn uniform_sample_square(rng: &mut impl Rng) -> Vector2 {
    Vector2::new(rng.random::<f32>(), rng.random::<f32>())
}

/// Uniform direction via the (z, phi) method.
pub fn uniform_sample_sphere(rng: &mut impl Rng) -> Vector3 {
    let z = rng.random::<f32>() * 2.0 - 1.0;
    let a = rng.random::<f32>() * (2.0 * PI);

    let r = (1.0 - z * z).sqrt();

    Vector3::new(r * a.cos(), r * a.sin(), z)
}

/// Shirley's concentric mapping of the unit square onto the unit disk.
pub fn concentric_sample_disk(rng: &mut impl Rng) -> Vector2 {
    let x = rng.random::<f32>() * 2.0 - 1.0;
    let y = rng.random::<f32>() * 2.0 - 1.0;

    if x == 0.0 && y == 0.0 {
        return Vector2::new(0.0, 0.0);
    }

    let (r, theta) = if x >= -y {
        if x > y {
            (x, y / x)
        } else {
            (y, 2.0 - x / y)
        }
    } else if x <= y {
        (-x, 4.0 + y / x)
    } else {
        (-y, 6.0 - x / y)
    };

    let theta = theta * FRAC_PI_4;
    Vector2::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted hemisphere direction around +z, by lifting a disk
/// sample onto the sphere.
pub fn cosine_sample_hemisphere(rng: &mut impl Rng) -> Vector3 {
    let d = concentric_sample_disk(rng);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vector3::new(d.x, d.y, z)
}
