//! Physical groups: numbered, optionally named labels over geometric
//! entities, used downstream to look up boundary conditions.
//!
//! Groups are a pure overlay. They never change what the generator produces;
//! they only decide which tag each generated element carries on export.

use std::collections::HashSet;

use super::index::GroupId;
use crate::error::{MeshError, Result};
use crate::geometry::{EntityRef, Geometry};

/// A labelled set of entities of one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalGroup {
    /// Dimension of every entity in the group.
    pub dim: usize,
    /// Positive tag, unique within `dim`.
    pub tag: u32,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// The grouped entities.
    pub entities: Vec<EntityRef>,
}

/// The physical groups defined on one geometry.
///
/// # Example
///
/// ```
/// use blockmesh::geometry::{primitives, GeometryBuilder};
/// use blockmesh::mesh::PhysicalGroups;
///
/// let mut b = GeometryBuilder::new();
/// let rect = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
/// let geometry = b.synchronize();
///
/// let mut groups = PhysicalGroups::new(&geometry);
/// let bottom = groups.add(1, &[rect.edges[0].into()], Some(1)).unwrap();
/// let bulk = groups.add(2, &[rect.face.into()], None).unwrap();
/// groups.set_name(2, 1, "bulk").unwrap();
/// assert_eq!(groups.group(bulk).tag, 1);
/// assert!(groups.add(1, &[rect.edges[1].into()], Some(1)).is_err());
/// # let _ = bottom;
/// ```
#[derive(Debug, Clone)]
pub struct PhysicalGroups<'g> {
    geometry: &'g Geometry,
    groups: Vec<PhysicalGroup>,
}

impl<'g> PhysicalGroups<'g> {
    /// Create an empty set of groups for `geometry`.
    pub fn new(geometry: &'g Geometry) -> Self {
        Self {
            geometry,
            groups: Vec::new(),
        }
    }

    /// The geometry the groups refer to.
    pub fn geometry(&self) -> &'g Geometry {
        self.geometry
    }

    /// Create a group of `entities`, all of dimension `dim`.
    ///
    /// With `tag = None` the next free tag of that dimension is assigned.
    pub fn add(&mut self, dim: usize, entities: &[EntityRef], tag: Option<u32>) -> Result<GroupId> {
        if dim > 3 {
            return Err(MeshError::invalid_param("dim", dim, "must be 0, 1, 2 or 3"));
        }
        if entities.is_empty() {
            return Err(MeshError::invalid_param(
                "entities",
                "[]",
                "a physical group needs at least one entity",
            ));
        }
        for &entity in entities {
            self.geometry.require(entity)?;
            if entity.dim() != dim {
                return Err(MeshError::DimensionMismatch {
                    expected: dim,
                    found: entity.dim(),
                    entity: format!("{:?}", entity),
                });
            }
        }

        let tag = match tag {
            Some(0) => {
                return Err(MeshError::invalid_param("tag", 0, "tags must be positive"));
            }
            Some(t) => {
                if self.find(dim, t).is_some() {
                    return Err(MeshError::TagConflict { dim, tag: t });
                }
                t
            }
            None => {
                self.groups
                    .iter()
                    .filter(|g| g.dim == dim)
                    .map(|g| g.tag)
                    .max()
                    .unwrap_or(0)
                    + 1
            }
        };

        let mut seen = HashSet::new();
        let unique: Vec<EntityRef> = entities.iter().copied().filter(|e| seen.insert(*e)).collect();

        let id = GroupId::new(self.groups.len());
        self.groups.push(PhysicalGroup {
            dim,
            tag,
            name: None,
            entities: unique,
        });
        Ok(id)
    }

    /// Create a group and name it in one call.
    pub fn add_named(
        &mut self,
        dim: usize,
        entities: &[EntityRef],
        tag: Option<u32>,
        name: &str,
    ) -> Result<GroupId> {
        let id = self.add(dim, entities, tag)?;
        self.groups[id.index()].name = Some(name.to_string());
        Ok(id)
    }

    /// Attach a name to the group `(dim, tag)`.
    pub fn set_name(&mut self, dim: usize, tag: u32, name: &str) -> Result<()> {
        let id = self
            .find(dim, tag)
            .ok_or_else(|| MeshError::UnknownEntity(format!("physical group ({}, {})", dim, tag)))?;
        self.groups[id.index()].name = Some(name.to_string());
        Ok(())
    }

    /// Find a group by dimension and tag.
    pub fn find(&self, dim: usize, tag: u32) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.dim == dim && g.tag == tag)
            .map(GroupId::new)
    }

    /// Find a group by name.
    pub fn find_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name.as_deref() == Some(name))
            .map(GroupId::new)
    }

    /// Get a group.
    pub fn group(&self, id: GroupId) -> &PhysicalGroup {
        &self.groups[id.index()]
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &PhysicalGroup)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId::new(i), g))
    }

    pub(crate) fn to_vec(&self) -> Vec<PhysicalGroup> {
        self.groups.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{primitives, GeometryBuilder, PointId};

    fn rectangle() -> (Geometry, primitives::Rectangle) {
        let mut b = GeometryBuilder::new();
        let r = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
        (b.synchronize(), r)
    }

    #[test]
    fn test_dimension_mismatch() {
        let (g, r) = rectangle();
        let mut groups = PhysicalGroups::new(&g);
        let result = groups.add(2, &[r.edges[0].into()], Some(1));
        assert!(matches!(
            result,
            Err(MeshError::DimensionMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_tag_conflict_same_dimension_only() {
        let (g, r) = rectangle();
        let mut groups = PhysicalGroups::new(&g);
        groups.add(1, &[r.edges[0].into()], Some(5)).unwrap();
        assert!(matches!(
            groups.add(1, &[r.edges[1].into()], Some(5)),
            Err(MeshError::TagConflict { dim: 1, tag: 5 })
        ));
        // Same tag at another dimension is fine
        assert!(groups.add(2, &[r.face.into()], Some(5)).is_ok());
    }

    #[test]
    fn test_auto_tags() {
        let (g, r) = rectangle();
        let mut groups = PhysicalGroups::new(&g);
        groups.add(1, &[r.edges[0].into()], Some(3)).unwrap();
        let id = groups.add(1, &[r.edges[1].into()], None).unwrap();
        assert_eq!(groups.group(id).tag, 4);
        let face = groups.add(2, &[r.face.into()], None).unwrap();
        assert_eq!(groups.group(face).tag, 1);
    }

    #[test]
    fn test_names() {
        let (g, r) = rectangle();
        let mut groups = PhysicalGroups::new(&g);
        groups.add_named(2, &[r.face.into()], Some(5), "bulk").unwrap();
        assert_eq!(groups.find_by_name("bulk"), groups.find(2, 5));
        assert!(groups.set_name(2, 6, "missing").is_err());
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        let (g, _) = rectangle();
        let mut groups = PhysicalGroups::new(&g);
        assert!(groups.add(0, &[], None).is_err());
        assert!(matches!(
            groups.add(0, &[PointId::new(99).into()], None),
            Err(MeshError::UnknownEntity(_))
        ));
        assert!(matches!(
            groups.add(2, &[PointId::new(0).into()], Some(0)),
            Err(MeshError::DimensionMismatch { .. })
        ));
    }
}
