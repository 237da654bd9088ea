//! Mesh directives, generation and output.
//!
//! # Overview
//!
//! Meshing a frozen [`Geometry`](crate::geometry::Geometry) takes three
//! inputs and produces one [`Mesh`]:
//!
//! - [`MeshConstraints`]: transfinite subdivision counts, structured
//!   face/volume marks, recombination requests and size overrides
//! - [`PhysicalGroups`]: numbered labels over entities, carried into the
//!   output for boundary-condition lookup
//! - [`MeshOptions`]: generation parameters
//!
//! [`MeshGenerator`] runs the pass. Node ids are canonical per geometric
//! position (see [`NodeKey`]), so adjoining blocks share their boundary
//! nodes.
//!
//! # Index Types
//!
//! - [`NodeId`] - Identifies a node
//! - [`ElementId`] - Identifies an element
//! - [`GroupId`] - Identifies a physical group
//!
//! # Example
//!
//! ```
//! use blockmesh::geometry::{primitives, GeometryBuilder};
//! use blockmesh::mesh::{MeshConstraints, MeshGenerator, MeshOptions, PhysicalGroups};
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
//! let bulk = groups.add_named(2, &[rect.face.into()], Some(1), "bulk").unwrap();
//!
//! let mesh = MeshGenerator::new(&constraints)
//!     .with_groups(&groups)
//!     .with_options(MeshOptions::default().sequential())
//!     .generate()
//!     .unwrap();
//! assert_eq!(mesh.group_elements(bulk).len(), 50);
//! ```

mod block;
mod constraints;
mod element;
mod generator;
mod index;
mod node_index;
mod options;
mod output;
mod physical;

pub use constraints::{MeshAlgorithm, MeshConstraints, TransfiniteFace};
pub use element::{Element, ElementKind};
pub use generator::MeshGenerator;
pub use index::{ElementId, GroupId, NodeId};
pub use node_index::{NodeIndex, NodeKey};
pub use options::MeshOptions;
pub use output::Mesh;
pub use physical::{PhysicalGroup, PhysicalGroups};
