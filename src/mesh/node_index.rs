//! Canonical node registry.
//!
//! A node is identified by the geometric entity it was generated on plus its
//! lattice position along that entity, never by its coordinates. Any block
//! reaching the same key gets the same [`NodeId`], which is what makes
//! adjoining blocks conforming. The first caller allocates; later callers
//! look up.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::NodeId;
use crate::geometry::{EdgeId, FaceId, PointId, VolumeId};

/// Where a node lives on the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// The node of a geometric point.
    Point(PointId),
    /// Interior node `k` of an edge, counted from the edge's start point.
    Edge(EdgeId, usize),
    /// Interior lattice node `(i, j)` of a transfinite face.
    Face(FaceId, usize, usize),
    /// Interior node `k` of a free face, in triangulator order.
    FreeFace(FaceId, usize),
    /// Interior lattice node `(i, j, k)` of a transfinite volume.
    Volume(VolumeId, usize, usize, usize),
}

/// Single-writer registry mapping [`NodeKey`]s to node ids and positions.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    ids: HashMap<NodeKey, NodeId>,
    positions: Vec<Point3<f64>>,
}

impl NodeIndex {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Return the node for `key`, allocating it at `position` if it is new.
    ///
    /// When the key already exists the stored position wins.
    pub fn get_or_insert(&mut self, key: NodeKey, position: Point3<f64>) -> NodeId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = NodeId::new(self.positions.len());
        self.positions.push(position);
        self.ids.insert(key, id);
        id
    }

    /// Look up an existing node.
    pub fn get(&self, key: &NodeKey) -> Option<NodeId> {
        self.ids.get(key).copied()
    }

    /// Position of a node.
    #[inline]
    pub fn position(&self, id: NodeId) -> Point3<f64> {
        self.positions[id.index()]
    }

    /// Consume the registry, returning node positions indexed by [`NodeId`].
    pub fn into_positions(self) -> Vec<Point3<f64>> {
        self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_writer_allocates() {
        let mut index = NodeIndex::new();
        let key = NodeKey::Edge(EdgeId::new(3), 2);
        let a = index.get_or_insert(key, Point3::new(1.0, 0.0, 0.0));
        let b = index.get_or_insert(key, Point3::new(1.0 + 1e-9, 0.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(index.len(), 1);
        assert_eq!(index.position(a), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_coincident_keys_stay_distinct() {
        // Keys, not coordinates, decide identity
        let mut index = NodeIndex::new();
        let a = index.get_or_insert(NodeKey::Point(PointId::new(0)), Point3::origin());
        let b = index.get_or_insert(NodeKey::Point(PointId::new(1)), Point3::origin());
        assert_ne!(a, b);
        assert_eq!(index.get(&NodeKey::Point(PointId::new(1))), Some(b));
    }
}
