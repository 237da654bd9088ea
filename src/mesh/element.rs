//! Element shapes and generated elements.

use super::index::NodeId;
use crate::geometry::EntityRef;

/// Shape of a generated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// 1-node point element on a geometric point.
    Point,
    /// 2-node line segment.
    Line,
    /// 3-node triangle.
    Triangle,
    /// 4-node quadrilateral.
    Quadrangle,
    /// 8-node hexahedron.
    Hexahedron,
}

impl ElementKind {
    /// Topological dimension.
    pub fn dim(self) -> usize {
        match self {
            ElementKind::Point => 0,
            ElementKind::Line => 1,
            ElementKind::Triangle | ElementKind::Quadrangle => 2,
            ElementKind::Hexahedron => 3,
        }
    }

    /// Number of corner nodes.
    pub fn num_nodes(self) -> usize {
        match self {
            ElementKind::Point => 1,
            ElementKind::Line => 2,
            ElementKind::Triangle => 3,
            ElementKind::Quadrangle => 4,
            ElementKind::Hexahedron => 8,
        }
    }

    /// Gmsh element type number.
    pub fn gmsh_type(self) -> u32 {
        match self {
            ElementKind::Point => 15,
            ElementKind::Line => 1,
            ElementKind::Triangle => 2,
            ElementKind::Quadrangle => 3,
            ElementKind::Hexahedron => 5,
        }
    }

    /// VTK cell type number.
    pub fn vtk_type(self) -> u32 {
        match self {
            ElementKind::Point => 1,
            ElementKind::Line => 3,
            ElementKind::Triangle => 5,
            ElementKind::Quadrangle => 9,
            ElementKind::Hexahedron => 12,
        }
    }
}

/// A generated element.
///
/// Node order follows the Gmsh convention: quads counter-clockwise with
/// respect to their face's boundary loop; hexahedra list the bottom quad
/// then the top quad so that the corner Jacobians are positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Shape of the element.
    pub kind: ElementKind,
    /// Corner nodes in shape order.
    pub nodes: Vec<NodeId>,
    /// The geometric entity the element was generated on.
    pub entity: EntityRef,
}

impl Element {
    pub(crate) fn new(kind: ElementKind, nodes: Vec<NodeId>, entity: EntityRef) -> Self {
        debug_assert_eq!(nodes.len(), kind.num_nodes());
        Self { kind, nodes, entity }
    }
}
