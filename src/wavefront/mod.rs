//! Parsers for the scene input: Wavefront OBJ geometry and the custom
//! MTL dialect carrying materials, lights and cameras.

pub mod mtl;
pub mod obj;

pub use mtl::{Mtl, MtlError};
pub use obj::{Obj, ObjError};
