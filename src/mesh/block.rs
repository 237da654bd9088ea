//! Lattice bookkeeping for structured blocks.
//!
//! A [`FaceGrid`] records the node ids of a meshed transfinite face in its
//! own lattice order. A [`HexFrame`] labels the corners of a transfinite
//! volume along three right-handed axes and maps each shell face's grid
//! onto the volume lattice, so hexahedra reuse the face nodes exactly.

use std::collections::{HashMap, HashSet};

use super::constraints::MeshConstraints;
use super::index::NodeId;
use crate::error::{MeshError, Result};
use crate::geometry::{EdgeId, FaceId, Geometry, PointId, VolumeId};

/// Node ids of a structured face, row by row along its first direction.
#[derive(Debug, Clone)]
pub(crate) struct FaceGrid {
    /// Lattice corners `(0,0)`, `(n1,0)`, `(n1,n2)`, `(0,n2)`.
    pub corners: [PointId; 4],
    pub dims: [usize; 2],
    pub nodes: Vec<NodeId>,
}

impl FaceGrid {
    #[inline]
    pub fn node(&self, i: usize, j: usize) -> NodeId {
        self.nodes[j * (self.dims[0] + 1) + i]
    }
}

/// Corner labelling of a hex block.
///
/// `corners[x + 2y + 4z]` is the corner at the low (`0`) or high (`1`) end
/// of each axis. The frame is right-handed with respect to the geometry, so
/// hexahedra built along it have positive Jacobians.
#[derive(Debug, Clone)]
pub(crate) struct HexFrame {
    pub corners: [PointId; 8],
    pub dims: [usize; 3],
}

impl HexFrame {
    /// Label the corners of `volume`, starting from its first shell face.
    pub fn new(
        geometry: &Geometry,
        constraints: &MeshConstraints<'_>,
        volume: VolumeId,
        first_face: [PointId; 4],
    ) -> Result<Self> {
        let edges = geometry.volume_edges(volume);
        let mut neighbours: HashMap<PointId, HashSet<PointId>> = HashMap::new();
        for &e in &edges {
            let edge = geometry.edge(e);
            neighbours.entry(edge.start).or_default().insert(edge.end);
            neighbours.entry(edge.end).or_default().insert(edge.start);
        }
        let none = HashSet::new();
        let adjacent = |p: PointId| neighbours.get(&p).unwrap_or(&none);
        let broken = |what: &str| MeshError::structuring(volume, format!("cannot label corners: {}", what));

        let [c000, mut c100, c110, mut c010] = first_face;
        let c001 = adjacent(c000)
            .iter()
            .copied()
            .find(|&p| p != c100 && p != c010)
            .ok_or_else(|| broken("no edge leaves the first face"))?;
        let common = |a: PointId, b: PointId, not: PointId| -> Result<PointId> {
            adjacent(a)
                .intersection(adjacent(b))
                .copied()
                .find(|&p| p != not)
                .ok_or_else(|| broken("shell is not a hexahedron"))
        };
        let mut c101 = common(c100, c001, c000)?;
        let mut c011 = common(c010, c001, c000)?;
        let c111 = common(c101, c011, c001)?;

        let pos = |p: PointId| geometry.position(p);
        let x = pos(c100) - pos(c000);
        let y = pos(c010) - pos(c000);
        let z = pos(c001) - pos(c000);
        if x.cross(&y).dot(&z) < 0.0 {
            std::mem::swap(&mut c100, &mut c010);
            std::mem::swap(&mut c101, &mut c011);
        }

        let count = |a: PointId, b: PointId| -> Result<usize> {
            let edge = find_edge(geometry, &edges, a, b).ok_or_else(|| broken("missing block edge"))?;
            constraints.edge_subdivision(edge).ok_or_else(|| {
                MeshError::structuring(volume, format!("edge {:?} has no subdivision count", edge))
            })
        };
        let dims = [count(c000, c100)?, count(c000, c010)?, count(c000, c001)?];

        Ok(Self {
            corners: [c000, c100, c010, c110, c001, c101, c011, c111],
            dims,
        })
    }

    /// Bits `[x, y, z]` of a block corner.
    fn bits(&self, p: PointId) -> Option<[usize; 3]> {
        self.corners
            .iter()
            .position(|&c| c == p)
            .map(|b| [b & 1, (b >> 1) & 1, (b >> 2) & 1])
    }

    /// Place a face grid on the volume lattice: calls `put([i, j, k], node)`
    /// for every node of the face.
    pub fn map_face(
        &self,
        face: FaceId,
        grid: &FaceGrid,
        mut put: impl FnMut([usize; 3], NodeId),
    ) -> Result<()> {
        let mismatch = |what: &str| MeshError::structuring(face, format!("does not fit the block: {}", what));
        let b00 = self.bits(grid.corners[0]).ok_or_else(|| mismatch("foreign corner"))?;
        let b10 = self.bits(grid.corners[1]).ok_or_else(|| mismatch("foreign corner"))?;
        let b01 = self.bits(grid.corners[3]).ok_or_else(|| mismatch("foreign corner"))?;

        let differing = |a: [usize; 3], b: [usize; 3]| -> Result<usize> {
            let axes: Vec<usize> = (0..3).filter(|&ax| a[ax] != b[ax]).collect();
            match axes.as_slice() {
                [ax] => Ok(*ax),
                _ => Err(mismatch("side is not an edge of the block")),
            }
        };
        let a1 = differing(b00, b10)?;
        let a2 = differing(b00, b01)?;
        if a1 == a2 {
            return Err(mismatch("degenerate side directions"));
        }
        let fixed = 3 - a1 - a2;
        if grid.dims != [self.dims[a1], self.dims[a2]] {
            return Err(mismatch("subdivisions differ from the block"));
        }

        let n = self.dims;
        for t in 0..=grid.dims[1] {
            for s in 0..=grid.dims[0] {
                let mut p = [0usize; 3];
                p[a1] = if b00[a1] == 0 { s } else { n[a1] - s };
                p[a2] = if b00[a2] == 0 { t } else { n[a2] - t };
                p[fixed] = b00[fixed] * n[fixed];
                put(p, grid.node(s, t));
            }
        }
        Ok(())
    }
}

fn find_edge(geometry: &Geometry, edges: &[EdgeId], a: PointId, b: PointId) -> Option<EdgeId> {
    edges.iter().copied().find(|&e| {
        let edge = geometry.edge(e);
        (edge.start == a && edge.end == b) || (edge.start == b && edge.end == a)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{primitives, GeometryBuilder};

    #[test]
    fn test_frame_of_cuboid() {
        let mut b = GeometryBuilder::new();
        let cube = primitives::cuboid(&mut b, 2.0, 1.0, 0.5, None).unwrap();
        let g = b.synchronize();
        let mut c = MeshConstraints::new(&g);
        for e in cube.x_edges() {
            c.set_edge_subdivision(e, 6).unwrap();
        }
        for e in cube.y_edges() {
            c.set_edge_subdivision(e, 4).unwrap();
        }
        for e in cube.z_edges() {
            c.set_edge_subdivision(e, 2).unwrap();
        }
        for f in cube.faces {
            c.mark_face_transfinite(f, None).unwrap();
        }
        let first = g.volume_faces(cube.volume)[0];
        let corners = c.transfinite_face(first).unwrap().corners;
        let frame = HexFrame::new(&g, &c, cube.volume, corners).unwrap();

        let pos = |p: PointId| g.position(p);
        let x = pos(frame.corners[1]) - pos(frame.corners[0]);
        let y = pos(frame.corners[2]) - pos(frame.corners[0]);
        let z = pos(frame.corners[4]) - pos(frame.corners[0]);
        assert!(x.cross(&y).dot(&z) > 0.0);

        let mut dims = frame.dims;
        dims.sort_unstable();
        assert_eq!(dims, [2, 4, 6]);

        let all: HashSet<PointId> = frame.corners.iter().copied().collect();
        assert_eq!(all.len(), 8);
    }
}
