//! Layered BRDFs as a tagged variant. Both `wi` (toward the camera) and
//! `wo` (toward the light) are unit vectors in world space pointing away
//! from the surface; `n` is the outward shading normal.

use std::f32::consts::FRAC_1_PI;

use rand::Rng;

use crate::sampling::cosine_sample_hemisphere;
use crate::vector::{Vector3, cross, dot, perpendicular};

/// Opaque handle a triangle carries to name its material in the scene.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialId(u32);

impl MaterialId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One importance-sampled outgoing direction with the BRDF value and the
/// probability density it was drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct BrdfSample {
    pub pdf: f32,
    pub brdf: Vector3,
    pub wo: Vector3,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Constant BRDF `reflectance / pi`, importance-sampled on the cosine
    /// term.
    Diffuse { reflectance: Vector3 },
    /// Perfect mirror. The BRDF is zero since a light sample never lands
    /// exactly in the mirror direction.
    SpecularReflection { reflectance: Vector3 },
    /// Perfect Snell refraction, falling back to reflection under total
    /// internal reflection.
    SpecularRefraction { index_of_refraction: f32 },
    /// Mixes two layers by the view-dependent Schlick approximation
    /// `r0 + (1 - r0)(1 - |w.n|)^5`.
    FresnelBlend {
        reflection: Box<Material>,
        refraction: Box<Material>,
        r0: f32,
    },
    /// Mixes two layers by a fixed weight in [0, 1].
    Blend {
        first: Box<Material>,
        second: Box<Material>,
        factor: f32,
    },
}

fn schlick(r0: f32, w: Vector3, n: Vector3) -> f32 {
    r0 + (1.0 - r0) * (1.0 - dot(w, n).abs()).powi(5)
}

fn same_hemisphere(wi: Vector3, wo: Vector3, n: Vector3) -> bool {
    (dot(wi, n) >= 0.0) == (dot(wo, n) >= 0.0)
}

fn sample_reflection(reflectance: Vector3, wi: Vector3, n: Vector3) -> BrdfSample {
    let wo = (2.0 * dot(wi, n).abs() * n - wi).to_unit();
    let pdf = if same_hemisphere(wi, wo, n) {
        dot(wo, n).abs()
    } else {
        0.0
    };
    BrdfSample {
        pdf,
        brdf: reflectance,
        wo,
    }
}

fn sample_refraction(ior: f32, wi: Vector3, n: Vector3) -> BrdfSample {
    let a = dot(-wi, n);
    let eta = if a < 0.0 { 1.0 / ior } else { ior };
    let n = if a < 0.0 { n } else { -n };

    let w = -a * eta;
    let k = 1.0 + (w - eta) * (w + eta);

    if k < 0.0 {
        // total internal reflection
        return sample_reflection(Vector3::ONE, wi, n);
    }

    let wo = (-eta * wi + (w - k.sqrt()) * n).to_unit();
    BrdfSample {
        pdf: 1.0,
        brdf: Vector3::ONE,
        wo,
    }
}

impl Material {
    /// Spectral BRDF value for light arriving from `wo` and leaving
    /// toward `wi`.
    pub fn brdf(&self, wi: Vector3, wo: Vector3, n: Vector3) -> Vector3 {
        match self {
            Material::Diffuse { reflectance } => *reflectance * FRAC_1_PI,
            Material::SpecularReflection { .. } | Material::SpecularRefraction { .. } => {
                Vector3::ZERO
            }
            Material::FresnelBlend {
                reflection,
                refraction,
                r0,
            } => {
                let r = schlick(*r0, wo, n);
                r * reflection.brdf(wi, wo, n) + (1.0 - r) * refraction.brdf(wi, wo, n)
            }
            Material::Blend {
                first,
                second,
                factor,
            } => *factor * first.brdf(wi, wo, n) + (1.0 - factor) * second.brdf(wi, wo, n),
        }
    }

    /// Draw an outgoing direction for incoming `wi`, importance-sampled
    /// per layer. Blends sample exactly one child and return its sample
    /// unmodified.
    pub fn sample_brdf(&self, wi: Vector3, n: Vector3, rng: &mut impl Rng) -> BrdfSample {
        match self {
            Material::Diffuse { .. } => {
                let tangent = perpendicular(n).to_unit();
                let bitangent = cross(n, tangent);
                let s = cosine_sample_hemisphere(rng);

                let wo = (s.x * tangent + s.y * bitangent + s.z * n).to_unit();
                BrdfSample {
                    pdf: s.z * FRAC_1_PI,
                    brdf: self.brdf(wi, wo, n),
                    wo,
                }
            }
            Material::SpecularReflection { reflectance } => sample_reflection(*reflectance, wi, n),
            Material::SpecularRefraction {
                index_of_refraction,
            } => sample_refraction(*index_of_refraction, wi, n),
            Material::FresnelBlend {
                reflection,
                refraction,
                r0,
            } => {
                if rng.random::<f32>() < schlick(*r0, wi, n) {
                    reflection.sample_brdf(wi, n, rng)
                } else {
                    refraction.sample_brdf(wi, n, rng)
                }
            }
            Material::Blend {
                first,
                second,
                factor,
            } => {
                if rng.random::<f32>() < *factor {
                    first.sample_brdf(wi, n, rng)
                } else {
                    second.sample_brdf(wi, n, rng)
                }
            }
        }
    }
}
