use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::vector::Vector3;

#[derive(Debug, Error)]
pub enum MtlError {
    #[error("failed reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A material description in the source dialect; translated into the
/// layered BRDF tree when the scene is assembled.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_map: String,
    pub diffuse: Vector3,
    pub specular: Vector3,
    pub emittance: Vector3,
    pub roughness: f32,
    pub transparency: f32,
    pub refl0: f32,
    pub refl90: f32,
    pub ior: f32,
}

impl Material {
    fn new(name: String) -> Self {
        Self {
            name,
            diffuse_map: String::new(),
            diffuse: Vector3::new(0.7, 0.7, 0.7),
            specular: Vector3::ONE,
            emittance: Vector3::ZERO,
            roughness: 0.001,
            transparency: 0.0,
            refl0: 0.0,
            refl90: 0.0,
            ior: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub center: Vector3,
    pub color: Vector3,
    pub radius: f32,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            center: Vector3::ZERO,
            color: Vector3::ONE,
            radius: 0.1,
            intensity: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::new(7.0, 5.0, 6.0),
            target: Vector3::ZERO,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 10.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mtl {
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    pub cameras: Vec<Camera>,
}

fn parse_err(line: usize, message: impl Into<String>) -> MtlError {
    MtlError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_float<'w>(words: &mut impl Iterator<Item = &'w str>, line: usize) -> Result<f32, MtlError> {
    let word = words
        .next()
        .ok_or_else(|| parse_err(line, "expected a number"))?;
    word.parse()
        .map_err(|_| parse_err(line, format!("invalid number '{word}'")))
}

fn parse_vec3<'w>(
    words: &mut impl Iterator<Item = &'w str>,
    line: usize,
) -> Result<Vector3, MtlError> {
    let x = parse_float(words, line)?;
    let y = parse_float(words, line)?;
    let z = parse_float(words, line)?;
    Ok(Vector3::new(x, y, z))
}

/// The block the directive applies to: the most recent `newmtl`,
/// `newlight` or `newcamera`.
fn current<'t, T>(table: &'t mut [T], line: usize, block: &str) -> Result<&'t mut T, MtlError> {
    table
        .last_mut()
        .ok_or_else(|| parse_err(line, format!("directive before any {block}")))
}

pub fn parse(content: &str) -> Result<Mtl, MtlError> {
    let mut mtl = Mtl::default();

    for (index, text) in content.lines().enumerate() {
        let line = index + 1;
        let mut words = text.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };

        let words = &mut words;
        match keyword {
            "newmtl" => {
                let name = words
                    .next()
                    .ok_or_else(|| parse_err(line, "newmtl without a name"))?;
                mtl.materials.push(Material::new(name.to_string()));
            }
            "kd" => {
                current(&mut mtl.materials, line, "newmtl")?.diffuse = parse_vec3(words, line)?;
            }
            "map_kd" => {
                current(&mut mtl.materials, line, "newmtl")?.diffuse_map =
                    words.next().unwrap_or_default().to_string();
            }
            "ks" => {
                current(&mut mtl.materials, line, "newmtl")?.specular = parse_vec3(words, line)?;
            }
            "emittance" => {
                current(&mut mtl.materials, line, "newmtl")?.emittance = parse_vec3(words, line)?;
            }
            "specularroughness" => {
                current(&mut mtl.materials, line, "newmtl")?.roughness = parse_float(words, line)?;
            }
            "transparency" => {
                current(&mut mtl.materials, line, "newmtl")?.transparency =
                    parse_float(words, line)?;
            }
            "reflat0deg" => {
                current(&mut mtl.materials, line, "newmtl")?.refl0 = parse_float(words, line)?;
            }
            "reflat90deg" => {
                current(&mut mtl.materials, line, "newmtl")?.refl90 = parse_float(words, line)?;
            }
            "indexofrefraction" => {
                current(&mut mtl.materials, line, "newmtl")?.ior = parse_float(words, line)?;
            }
            "newlight" => mtl.lights.push(Light::default()),
            "lightposition" => {
                current(&mut mtl.lights, line, "newlight")?.center = parse_vec3(words, line)?;
            }
            "lightcolor" => {
                current(&mut mtl.lights, line, "newlight")?.color = parse_vec3(words, line)?;
            }
            "lightradius" => {
                current(&mut mtl.lights, line, "newlight")?.radius = parse_float(words, line)?;
            }
            "lightintensity" => {
                current(&mut mtl.lights, line, "newlight")?.intensity = parse_float(words, line)?;
            }
            "newcamera" => mtl.cameras.push(Camera::default()),
            "cameraposition" => {
                current(&mut mtl.cameras, line, "newcamera")?.position = parse_vec3(words, line)?;
            }
            "cameratarget" => {
                current(&mut mtl.cameras, line, "newcamera")?.target = parse_vec3(words, line)?;
            }
            "cameraup" => {
                current(&mut mtl.cameras, line, "newcamera")?.up = parse_vec3(words, line)?;
            }
            "camerafov" => {
                current(&mut mtl.cameras, line, "newcamera")?.fov = parse_float(words, line)?;
            }
            // comments and anything unrecognized are skipped
            _ => continue,
        }
    }

    Ok(mtl)
}

pub fn load(path: &Path) -> Result<Mtl, MtlError> {
    let content = fs::read_to_string(path).map_err(|e| MtlError::Io(path.to_path_buf(), e))?;
    parse(&content)
}
