//! Meshing algorithms.
//!
//! The numerical kernels used by the generator, independent of the geometry
//! model:
//!
//! - **Transfinite interpolation**: Coons patches and their 3D analogue over
//!   structured lattices
//! - **Triangulation**: the seam for unstructured face meshing, with a
//!   built-in Delaunay triangulator for convex planar faces
//! - **Recombination**: greedy merging of triangle pairs into quads
//! - **Quality**: quad angle quality and hex corner Jacobians

pub mod progress;
pub mod quality;
pub mod recombine;
pub mod transfinite;
pub mod triangulate;

pub use progress::Progress;
