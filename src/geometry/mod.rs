//! Geometry model for block meshing.
//!
//! A geometry is a set of points joined by straight edges, edges closed into
//! curve loops, loops bounding faces, and faces closed into surface loops that
//! enclose volumes. Creation goes through [`GeometryBuilder`]; calling
//! [`GeometryBuilder::synchronize`] freezes it into a [`Geometry`] that the
//! meshing stages read but never modify.
//!
//! # Index Types
//!
//! - [`PointId`], [`EdgeId`], [`CurveLoopId`], [`FaceId`], [`SurfaceLoopId`],
//!   [`VolumeId`] identify entities by creation order
//! - [`SignedEdge`] is an edge plus a traversal direction (`-edge` reverses)
//! - [`EntityRef`] is a dimension-tagged reference used by directives and
//!   physical groups

pub(crate) mod index;
mod model;
pub mod primitives;

pub use index::{CurveLoopId, EdgeId, EntityRef, FaceId, PointId, SignedEdge, SurfaceLoopId, VolumeId};
pub use model::{CurveLoop, Edge, Face, Geometry, GeometryBuilder, Point, SurfaceLoop, Volume};
