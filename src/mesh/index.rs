//! Index types for generated mesh entities.

use std::fmt::{self, Debug};

use crate::geometry::index::impl_entity_id;

/// A type-safe node index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

/// A type-safe element index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ElementId(u32);

/// Identifies a physical group in creation order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GroupId(u32);

impl_entity_id!(NodeId, "N");
impl_entity_id!(ElementId, "El");
impl_entity_id!(GroupId, "G");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let n = NodeId::new(0);
        assert_eq!(n.index(), 0);
        assert_eq!(n.tag(), 1);
        assert_eq!(format!("{:?}", n), "N(1)");
    }
}
