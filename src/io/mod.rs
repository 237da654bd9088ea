//! Mesh file export.
//!
//! # Supported Formats
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | Gmsh MSH 2.2 | `.msh` | ASCII, physical tags and names |
//! | Legacy VTK | `.vtk` | ASCII unstructured grid, highest-dimension cells |
//!
//! # Usage
//!
//! ```no_run
//! use blockmesh::geometry::{primitives, GeometryBuilder};
//! use blockmesh::mesh::{MeshConstraints, MeshGenerator};
//!
//! let mut b = GeometryBuilder::new();
//! primitives::rectangle(&mut b, 2.0, 1.0, Some(0.1)).unwrap();
//! let geometry = b.synchronize();
//! let constraints = MeshConstraints::new(&geometry);
//! let mesh = MeshGenerator::new(&constraints).generate().unwrap();
//!
//! // Format chosen from the extension
//! blockmesh::io::save(&mesh, "rectangle.msh").unwrap();
//! blockmesh::io::save(&mesh, "rectangle.vtk").unwrap();
//! ```

pub mod msh;
pub mod vtk;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Gmsh MSH 2.2 ASCII.
    Msh,
    /// Legacy VTK ASCII.
    Vtk,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "msh" => Some(Format::Msh),
            "vtk" => Some(Format::Vtk),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Save a mesh with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Msh => msh::save(mesh, path),
        Format::Vtk => vtk::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("out/block.MSH"), Some(Format::Msh));
        assert_eq!(Format::from_path("block.vtk"), Some(Format::Vtk));
        assert_eq!(Format::from_path("block.stl"), None);
        assert_eq!(Format::from_path("block"), None);
    }
}
