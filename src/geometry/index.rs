//! Index types for geometric entities.
//!
//! Every entity created in a [`GeometryBuilder`](super::GeometryBuilder) is
//! identified by a type-safe wrapper around its creation index. Indices are
//! 0-based internally; [`tag`](PointId::tag) gives the 1-based number used by
//! mesh file formats.

use std::fmt::{self, Debug};
use std::ops::Neg;

macro_rules! impl_entity_id {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new id from a raw creation index.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Get the raw (0-based) index.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the 1-based tag used in exported files.
            #[inline]
            pub fn tag(self) -> usize {
                self.0 as usize + 1
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.tag())
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

/// Identifies a geometric point.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PointId(u32);

/// Identifies a straight edge between two points.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// Identifies a closed loop of signed edges.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CurveLoopId(u32);

/// Identifies a face bounded by a curve loop.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// Identifies a closed shell of faces.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SurfaceLoopId(u32);

/// Identifies a volume enclosed by a surface loop.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VolumeId(u32);

pub(crate) use impl_entity_id;

impl_entity_id!(PointId, "P");
impl_entity_id!(EdgeId, "E");
impl_entity_id!(CurveLoopId, "CL");
impl_entity_id!(FaceId, "F");
impl_entity_id!(SurfaceLoopId, "SL");
impl_entity_id!(VolumeId, "V");

/// An edge used in a given direction inside a curve loop.
///
/// `-edge` yields the edge traversed from its end point to its start point.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SignedEdge {
    /// The underlying edge.
    pub edge: EdgeId,
    /// Whether the edge is traversed end -> start.
    pub reversed: bool,
}

impl SignedEdge {
    /// The edge traversed forward.
    pub fn forward(edge: EdgeId) -> Self {
        Self { edge, reversed: false }
    }

    /// The edge traversed backward.
    pub fn backward(edge: EdgeId) -> Self {
        Self { edge, reversed: true }
    }
}

impl Debug for SignedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "-{:?}", self.edge)
        } else {
            write!(f, "{:?}", self.edge)
        }
    }
}

impl From<EdgeId> for SignedEdge {
    fn from(edge: EdgeId) -> Self {
        Self::forward(edge)
    }
}

impl Neg for EdgeId {
    type Output = SignedEdge;

    fn neg(self) -> SignedEdge {
        SignedEdge::backward(self)
    }
}

impl Neg for SignedEdge {
    type Output = SignedEdge;

    fn neg(self) -> SignedEdge {
        SignedEdge {
            edge: self.edge,
            reversed: !self.reversed,
        }
    }
}

/// A reference to a meshable entity of any dimension.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum EntityRef {
    /// Dimension 0.
    Point(PointId),
    /// Dimension 1.
    Edge(EdgeId),
    /// Dimension 2.
    Face(FaceId),
    /// Dimension 3.
    Volume(VolumeId),
}

impl EntityRef {
    /// Topological dimension of the entity.
    pub fn dim(self) -> usize {
        match self {
            EntityRef::Point(_) => 0,
            EntityRef::Edge(_) => 1,
            EntityRef::Face(_) => 2,
            EntityRef::Volume(_) => 3,
        }
    }

    /// 1-based tag of the entity within its dimension.
    pub fn tag(self) -> usize {
        match self {
            EntityRef::Point(id) => id.tag(),
            EntityRef::Edge(id) => id.tag(),
            EntityRef::Face(id) => id.tag(),
            EntityRef::Volume(id) => id.tag(),
        }
    }
}

impl From<PointId> for EntityRef {
    fn from(id: PointId) -> Self {
        EntityRef::Point(id)
    }
}

impl From<EdgeId> for EntityRef {
    fn from(id: EdgeId) -> Self {
        EntityRef::Edge(id)
    }
}

impl From<FaceId> for EntityRef {
    fn from(id: FaceId) -> Self {
        EntityRef::Face(id)
    }
}

impl From<VolumeId> for EntityRef {
    fn from(id: VolumeId) -> Self {
        EntityRef::Volume(id)
    }
}
