use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::vector::{Vector2, Vector3};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// One corner of a face: vertex / texcoord / normal indices as written in
/// the file. Zero means absent, negative counts from the end of the
/// respective table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub v: i32,
    pub t: i32,
    pub n: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

/// A run of faces sharing one material.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub material: String,
    pub polygons: Vec<Face>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Obj {
    pub mtl_lib: PathBuf,
    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub texcoords: Vec<Vector2>,
    pub chunks: Vec<Chunk>,
}

impl Obj {
    pub fn vertex(&self, index: i32) -> Vector3 {
        index_table(&self.vertices, index)
    }

    pub fn normal(&self, index: i32) -> Vector3 {
        index_table(&self.normals, index)
    }

    pub fn texcoord(&self, index: i32) -> Vector2 {
        index_table(&self.texcoords, index)
    }
}

fn index_table<T: Copy + Default>(table: &[T], index: i32) -> T {
    if index == 0 {
        T::default()
    } else if index < 0 {
        table[(table.len() as i32 + index) as usize]
    } else {
        table[(index - 1) as usize]
    }
}

fn parse_err(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_float(word: &str, line: usize) -> Result<f32, ObjError> {
    word.parse()
        .map_err(|_| parse_err(line, format!("invalid number '{word}'")))
}

fn parse_vec3<'w>(
    words: &mut impl Iterator<Item = &'w str>,
    line: usize,
) -> Result<Vector3, ObjError> {
    let mut components = [0.0; 3];
    for component in &mut components {
        let word = words
            .next()
            .ok_or_else(|| parse_err(line, "expected three numbers"))?;
        *component = parse_float(word, line)?;
    }
    Ok(Vector3::new(components[0], components[1], components[2]))
}

fn parse_vec2<'w>(
    words: &mut impl Iterator<Item = &'w str>,
    line: usize,
) -> Result<Vector2, ObjError> {
    let mut components = [0.0; 2];
    for component in &mut components {
        let word = words
            .next()
            .ok_or_else(|| parse_err(line, "expected two numbers"))?;
        *component = parse_float(word, line)?;
    }
    Ok(Vector2::new(components[0], components[1]))
}

/// Parse a `v[/t[/n]]` corner; missing or empty positions read as index 0.
fn parse_point(word: &str, line: usize) -> Result<Point, ObjError> {
    let mut indices = [0i32; 3];
    for (slot, part) in indices.iter_mut().zip(word.splitn(3, '/')) {
        if !part.is_empty() {
            *slot = part
                .parse()
                .map_err(|_| parse_err(line, format!("invalid index '{part}'")))?;
        }
    }
    Ok(Point {
        v: indices[0],
        t: indices[1],
        n: indices[2],
    })
}

fn parse_face<'w>(
    words: &mut impl Iterator<Item = &'w str>,
    line: usize,
) -> Result<Face, ObjError> {
    let mut points = [Point::default(); 3];
    for point in &mut points {
        let word = words
            .next()
            .ok_or_else(|| parse_err(line, "expected three face corners"))?;
        *point = parse_point(word, line)?;
    }
    if words.next().is_some() {
        return Err(parse_err(line, "only triangulated faces are supported"));
    }
    Ok(Face {
        p1: points[0],
        p2: points[1],
        p3: points[2],
    })
}

pub fn parse(content: &str) -> Result<Obj, ObjError> {
    let mut obj = Obj::default();

    for (index, text) in content.lines().enumerate() {
        let line = index + 1;
        let mut words = text.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };

        match keyword {
            "#" => continue,
            "v" => obj.vertices.push(parse_vec3(&mut words, line)?),
            "vn" => obj.normals.push(parse_vec3(&mut words, line)?),
            "vt" => obj.texcoords.push(parse_vec2(&mut words, line)?),
            "f" => {
                let face = parse_face(&mut words, line)?;
                let chunk = obj
                    .chunks
                    .last_mut()
                    .ok_or_else(|| parse_err(line, "face before any usemtl"))?;
                chunk.polygons.push(face);
            }
            "usemtl" => {
                let material = words
                    .next()
                    .ok_or_else(|| parse_err(line, "usemtl without a name"))?;
                obj.chunks.push(Chunk {
                    material: material.to_string(),
                    polygons: Vec::new(),
                });
            }
            "mtllib" => {
                let lib = words
                    .next()
                    .ok_or_else(|| parse_err(line, "mtllib without a path"))?;
                obj.mtl_lib = PathBuf::from(lib);
            }
            // grouping and smoothing are irrelevant to the tracer
            "o" | "g" | "s" => continue,
            other if other.starts_with('#') => continue,
            other => return Err(parse_err(line, format!("unknown expression '{other}'"))),
        }
    }

    Ok(obj)
}

pub fn load(path: &Path) -> Result<Obj, ObjError> {
    let content = fs::read_to_string(path).map_err(|e| ObjError::Io(path.to_path_buf(), e))?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXAMPLE: &str = "\
# a single triangle
mtllib scene.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
usemtl white
f 1/1/1 2/1/1 3/1/1
";

    #[test]
    fn test_parse_example() {
        let obj = parse(EXAMPLE).unwrap();

        assert_eq!(obj.mtl_lib, PathBuf::from("scene.mtl"));
        assert_eq!(obj.vertices.len(), 3);
        assert_eq!(obj.normals, vec![Vector3::new(0.0, 0.0, 1.0)]);
        assert_eq!(obj.chunks.len(), 1);
        assert_eq!(obj.chunks[0].material, "white");
        assert_eq!(
            obj.chunks[0].polygons,
            vec![Face {
                p1: Point { v: 1, t: 1, n: 1 },
                p2: Point { v: 2, t: 1, n: 1 },
                p3: Point { v: 3, t: 1, n: 1 },
            }]
        );
    }

    #[test]
    fn test_point_variants() {
        assert_eq!(parse_point("7", 1).unwrap(), Point { v: 7, t: 0, n: 0 });
        assert_eq!(parse_point("7//3", 1).unwrap(), Point { v: 7, t: 0, n: 3 });
        assert_eq!(parse_point("7/2", 1).unwrap(), Point { v: 7, t: 2, n: 0 });
        assert_eq!(
            parse_point("-1/-2/-3", 1).unwrap(),
            Point {
                v: -1,
                t: -2,
                n: -3,
            }
        );
    }

    #[test]
    fn test_index_resolution() {
        let obj = parse(EXAMPLE).unwrap();

        // one-based from the front, negative from the back, zero absent
        assert_eq!(obj.vertex(1), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(obj.vertex(3), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(obj.vertex(-1), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(obj.vertex(-3), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(obj.normal(0), Vector3::ZERO);
    }

    #[test]
    fn test_face_outside_chunk_is_rejected() {
        let result = parse("v 0 0 0\nf 1 1 1\n");

        assert!(matches!(result, Err(ObjError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_unknown_keyword_is_rejected() {
        assert!(parse("nope 1 2 3\n").is_err());
    }
}
