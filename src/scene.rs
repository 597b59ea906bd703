//! Scene assembly: triangles from the OBJ tables, the layered material
//! hierarchy from the MTL descriptions, lights, cameras and the kd-tree.

use std::collections::HashMap;

use thiserror::Error;

use crate::camera::Camera;
use crate::kdtree::{self, CompactTree};
use crate::light::SphereLight;
use crate::material::{Material, MaterialId};
use crate::ray::Ray;
use crate::triangle::Triangle;
use crate::triray::TriRayIntersection;
use crate::wavefront::{Mtl, Obj, mtl};

/// Tolerance when testing blend weights against their degenerate values.
const EPSILON: f32 = 1e-4;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("face references unknown material '{0}'")]
    UnknownMaterial(String),
}

pub struct Scene {
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    cameras: Vec<Camera>,
    lights: Vec<SphereLight>,
    kdtree: CompactTree,
}

/// The transparency layer: refraction against diffuse.
fn blend1_from_mtl(material: &mtl::Material) -> Material {
    if (material.transparency - 1.0).abs() < EPSILON {
        Material::SpecularRefraction {
            index_of_refraction: material.ior,
        }
    } else if material.transparency.abs() < EPSILON {
        Material::Diffuse {
            reflectance: material.diffuse,
        }
    } else {
        Material::Blend {
            first: Box::new(Material::SpecularRefraction {
                index_of_refraction: material.ior,
            }),
            second: Box::new(Material::Diffuse {
                reflectance: material.diffuse,
            }),
            factor: material.transparency,
        }
    }
}

/// The reflectivity layer on top: a Fresnel-weighted mirror, faded in by
/// the grazing-angle reflectance. Degenerate weights collapse the tree.
fn blend0_from_mtl(material: &mtl::Material, blend1: Material) -> Material {
    let fresnel = |refraction: Material| Material::FresnelBlend {
        reflection: Box::new(Material::SpecularReflection {
            reflectance: material.specular,
        }),
        refraction: Box::new(refraction),
        r0: material.refl0,
    };

    if (material.refl90 - 1.0).abs() < EPSILON {
        fresnel(blend1)
    } else if material.refl90.abs() < EPSILON {
        blend1
    } else {
        Material::Blend {
            first: Box::new(fresnel(blend1.clone())),
            second: Box::new(blend1),
            factor: material.refl90,
        }
    }
}

fn material_from_mtl(material: &mtl::Material) -> Material {
    blend0_from_mtl(material, blend1_from_mtl(material))
}

fn triangles_from_obj(obj: &Obj, material_ids: &HashMap<&str, MaterialId>) -> Result<Vec<Triangle>, SceneError> {
    let mut triangles = Vec::new();
    for chunk in &obj.chunks {
        let material = *material_ids
            .get(chunk.material.as_str())
            .ok_or_else(|| SceneError::UnknownMaterial(chunk.material.clone()))?;

        for face in &chunk.polygons {
            triangles.push(Triangle {
                v0: obj.vertex(face.p1.v),
                v1: obj.vertex(face.p2.v),
                v2: obj.vertex(face.p3.v),
                n0: obj.normal(face.p1.n),
                n1: obj.normal(face.p2.n),
                n2: obj.normal(face.p3.n),
                uv0: obj.texcoord(face.p1.t),
                uv1: obj.texcoord(face.p2.t),
                uv2: obj.texcoord(face.p3.t),
                material,
            });
        }
    }
    Ok(triangles)
}

impl Scene {
    pub fn new(obj: &Obj, mtl: &Mtl) -> Result<Self, SceneError> {
        let materials: Vec<Material> = mtl.materials.iter().map(material_from_mtl).collect();
        let material_ids: HashMap<&str, MaterialId> = mtl
            .materials
            .iter()
            .enumerate()
            .map(|(index, material)| (material.name.as_str(), MaterialId::new(index as u32)))
            .collect();

        let triangles = triangles_from_obj(obj, &material_ids)?;

        let cameras = mtl
            .cameras
            .iter()
            .map(|c| Camera::new(c.position, c.target, c.up, c.fov.to_radians()))
            .collect();
        let lights = mtl
            .lights
            .iter()
            .map(|l| SphereLight::new(l.center, l.color, l.intensity, l.radius))
            .collect();

        tracing::info!(
            triangles = triangles.len(),
            materials = materials.len(),
            lights = mtl.lights.len(),
            cameras = mtl.cameras.len(),
            "scene assembled"
        );

        let kdtree = kdtree::build(&triangles);

        Ok(Self {
            triangles,
            materials,
            cameras,
            lights,
            kdtree,
        })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn lights(&self) -> &[SphereLight] {
        &self.lights
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn intersect(&self, ray: &Ray, tmin: f32, tmax: f32) -> Option<TriRayIntersection<'_>> {
        self.kdtree.closest_hit(ray, tmin, tmax)
    }

    pub fn any_intersect(&self, ray: &Ray, tmin: f32, tmax: f32) -> bool {
        self.kdtree.any_hit(ray, tmin, tmax)
    }
}
