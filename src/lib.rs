//! # Blockmesh
//!
//! Structured quadrilateral and hexahedral block meshing by transfinite
//! interpolation.
//!
//! A block is a four-sided face or a six-faced volume whose edges carry
//! subdivision counts. Blockmesh fills each block with a regular lattice of
//! nodes, stitches adjoining blocks through shared boundary nodes, labels the
//! result with physical groups and writes it in solver-ready formats.
//!
//! ## Features
//!
//! - **Geometry model**: points, straight edges, curve loops, faces, surface
//!   loops and volumes, frozen before meshing
//! - **Transfinite constraints**: validated when applied, never at generation
//! - **Conforming output**: nodes are keyed by geometric position, not
//!   coordinates, so blocks sharing an edge or face share its nodes
//! - **Mixed meshes**: free faces go through a pluggable triangulator and an
//!   optional triangle-to-quad recombination pass
//! - **Export**: Gmsh MSH 2.2 and legacy VTK
//!
//! ## Quick Start
//!
//! ```
//! use blockmesh::prelude::*;
//!
//! let mut b = GeometryBuilder::new();
//! let rect = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
//! let geometry = b.synchronize();
//!
//! let mut constraints = MeshConstraints::new(&geometry);
//! for (edge, n) in rect.edges.iter().zip([10, 5, 10, 5]) {
//!     constraints.set_edge_subdivision(*edge, n).unwrap();
//! }
//! constraints.mark_face_transfinite(rect.face, None).unwrap();
//!
//! let mut groups = PhysicalGroups::new(&geometry);
//! groups.add(2, &[rect.face.into()], Some(5)).unwrap();
//!
//! let mesh = MeshGenerator::new(&constraints)
//!     .with_groups(&groups)
//!     .generate()
//!     .unwrap();
//! assert_eq!(mesh.count(ElementKind::Quadrangle), 50);
//! assert_eq!(mesh.num_nodes(), 66);
//! ```
//!
//! ## Hex Blocks
//!
//! ```
//! use blockmesh::prelude::*;
//!
//! let mut b = GeometryBuilder::new();
//! let cube = primitives::cuboid(&mut b, 1.0, 0.1, 0.04, None).unwrap();
//! let geometry = b.synchronize();
//!
//! let mut constraints = MeshConstraints::new(&geometry);
//! for (edges, n) in [(cube.x_edges(), 60), (cube.y_edges(), 10), (cube.z_edges(), 5)] {
//!     for e in edges {
//!         constraints.set_edge_subdivision(e, n).unwrap();
//!     }
//! }
//! for f in cube.faces {
//!     constraints.mark_face_transfinite(f, None).unwrap();
//! }
//! constraints.mark_volume_transfinite(cube.volume).unwrap();
//!
//! let mesh = MeshGenerator::new(&constraints).generate().unwrap();
//! assert_eq!(mesh.count(ElementKind::Hexahedron), 3000);
//! assert_eq!(mesh.num_nodes(), 4026);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use blockmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::geometry::{
        primitives, EdgeId, EntityRef, FaceId, Geometry, GeometryBuilder, PointId, SignedEdge,
        VolumeId,
    };
    pub use crate::mesh::{
        ElementKind, Mesh, MeshAlgorithm, MeshConstraints, MeshGenerator, MeshOptions, NodeId,
        PhysicalGroups,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
