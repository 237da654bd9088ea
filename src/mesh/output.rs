//! The generated mesh.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::element::{Element, ElementKind};
use super::index::{ElementId, GroupId, NodeId};
use super::physical::PhysicalGroup;
use crate::algo::quality;
use crate::geometry::EntityRef;

/// Nodes, elements and physical groups produced by one generation pass.
///
/// A mesh is immutable once generated. Node and element ids are dense and
/// follow generation order, which is deterministic for a given input.
#[derive(Debug, Clone)]
pub struct Mesh {
    nodes: Vec<Point3<f64>>,
    elements: Vec<Element>,
    groups: Vec<PhysicalGroup>,
    entity_groups: HashMap<EntityRef, Vec<GroupId>>,
}

impl Mesh {
    pub(crate) fn new(nodes: Vec<Point3<f64>>, elements: Vec<Element>, groups: Vec<PhysicalGroup>) -> Self {
        let mut entity_groups: HashMap<EntityRef, Vec<GroupId>> = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for &entity in &group.entities {
                entity_groups.entry(entity).or_default().push(GroupId::new(g));
            }
        }
        Self {
            nodes,
            elements,
            groups,
            entity_groups,
        }
    }

    // ==================== Counts ====================

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements of every kind.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Number of elements of one kind.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of elements of one dimension.
    pub fn count_dim(&self, dim: usize) -> usize {
        self.elements.iter().filter(|e| e.kind.dim() == dim).count()
    }

    /// Highest element dimension present, if any.
    pub fn max_dim(&self) -> Option<usize> {
        self.elements.iter().map(|e| e.kind.dim()).max()
    }

    // ==================== Nodes and elements ====================

    /// Position of a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> Point3<f64> {
        self.nodes[id.index()]
    }

    /// All node positions indexed by [`NodeId`].
    pub fn nodes(&self) -> &[Point3<f64>] {
        &self.nodes
    }

    /// Get an element.
    #[inline]
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    /// All elements indexed by [`ElementId`].
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterate over element ids.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.elements.len()).map(ElementId::new)
    }

    /// Elements generated on one geometric entity.
    pub fn elements_of(&self, entity: impl Into<EntityRef>) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        let entity = entity.into();
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.entity == entity)
            .map(|(i, e)| (ElementId::new(i), e))
    }

    /// Positions of an element's nodes.
    pub fn element_points(&self, id: ElementId) -> Vec<Point3<f64>> {
        self.element(id).nodes.iter().map(|&n| self.node(n)).collect()
    }

    /// Axis-aligned bounds of all nodes.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.nodes.first()?;
        Some(
            self.nodes
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))),
        )
    }

    // ==================== Physical groups ====================

    /// The physical groups the mesh was generated with.
    pub fn groups(&self) -> &[PhysicalGroup] {
        &self.groups
    }

    /// Get a group.
    pub fn group(&self, id: GroupId) -> &PhysicalGroup {
        &self.groups[id.index()]
    }

    /// Iterate over group ids.
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> {
        (0..self.groups.len()).map(GroupId::new)
    }

    /// Groups containing the entity an element was generated on.
    pub fn element_groups(&self, id: ElementId) -> &[GroupId] {
        self.entity_groups
            .get(&self.element(id).entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Elements carried by a group: those of the group's dimension generated
    /// on one of its entities.
    pub fn group_elements(&self, id: GroupId) -> Vec<ElementId> {
        let group = self.group(id);
        self.element_ids()
            .filter(|&e| {
                let el = self.element(e);
                el.kind.dim() == group.dim && self.element_groups(e).contains(&id)
            })
            .collect()
    }

    /// Physical tags of an element, in group creation order.
    pub fn physical_tags(&self, id: ElementId) -> Vec<u32> {
        let dim = self.element(id).kind.dim();
        self.element_groups(id)
            .iter()
            .map(|&g| self.group(g))
            .filter(|g| g.dim == dim)
            .map(|g| g.tag)
            .collect()
    }

    // ==================== Shape measures ====================

    /// Signed area of a quadrangle seen from `normal`. `None` for other kinds.
    pub fn quad_signed_area(&self, id: ElementId, normal: &Vector3<f64>) -> Option<f64> {
        let el = self.element(id);
        if el.kind != ElementKind::Quadrangle {
            return None;
        }
        let p = self.element_points(id);
        Some(quality::quad_signed_area(&[p[0], p[1], p[2], p[3]], &normal.normalize()))
    }

    /// Signed volume of a hexahedron. `None` for other kinds.
    pub fn hex_signed_volume(&self, id: ElementId) -> Option<f64> {
        self.hex_points(id).map(|h| quality::hex_signed_volume(&h))
    }

    /// Smallest corner Jacobian of a hexahedron. `None` for other kinds.
    pub fn hex_min_jacobian(&self, id: ElementId) -> Option<f64> {
        self.hex_points(id).map(|h| quality::hex_min_jacobian(&h))
    }

    fn hex_points(&self, id: ElementId) -> Option<[Point3<f64>; 8]> {
        let el = self.element(id);
        if el.kind != ElementKind::Hexahedron {
            return None;
        }
        let mut out = [Point3::origin(); 8];
        for (slot, &n) in out.iter_mut().zip(&el.nodes) {
            *slot = self.node(n);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FaceId, PointId};

    fn unit_quad_mesh() -> Mesh {
        let nodes = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let face = EntityRef::Face(FaceId::new(0));
        let elements = vec![
            Element::new(ElementKind::Point, vec![NodeId::new(0)], PointId::new(0).into()),
            Element::new(
                ElementKind::Quadrangle,
                (0..4).map(NodeId::new).collect(),
                face,
            ),
        ];
        let groups = vec![PhysicalGroup {
            dim: 2,
            tag: 7,
            name: Some("bulk".to_string()),
            entities: vec![face],
        }];
        Mesh::new(nodes, elements, groups)
    }

    #[test]
    fn test_counts() {
        let mesh = unit_quad_mesh();
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.count(ElementKind::Quadrangle), 1);
        assert_eq!(mesh.count_dim(0), 1);
        assert_eq!(mesh.max_dim(), Some(2));
    }

    #[test]
    fn test_group_lookup() {
        let mesh = unit_quad_mesh();
        let quad = ElementId::new(1);
        assert_eq!(mesh.group_elements(GroupId::new(0)), vec![quad]);
        assert_eq!(mesh.physical_tags(quad), vec![7]);
        assert!(mesh.physical_tags(ElementId::new(0)).is_empty());
    }

    #[test]
    fn test_measures() {
        let mesh = unit_quad_mesh();
        let quad = ElementId::new(1);
        assert!((mesh.quad_signed_area(quad, &Vector3::z()).unwrap() - 1.0).abs() < 1e-12);
        assert!(mesh.hex_signed_volume(quad).is_none());
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert_eq!(lo, Point3::origin());
        assert_eq!(hi, Point3::new(1.0, 1.0, 0.0));
    }
}
