//! Transfinite constraint set and per-entity mesh directives.
//!
//! Directives attach to a frozen [`Geometry`]. Transfinite preconditions are
//! checked when a directive is applied, not at generation time, so a
//! generator given a [`MeshConstraints`] never fails on structuring.

use std::collections::{BTreeSet, HashMap};

use crate::error::{MeshError, Result};
use crate::geometry::{EdgeId, EntityRef, FaceId, Geometry, PointId, SignedEdge, VolumeId};

/// Meshing algorithm requested for a face that is not transfinite.
///
/// The choice is recorded and logged, but the configured
/// [`Triangulator`](crate::algo::triangulate::Triangulator) meshes every free
/// face the same way. The built-in [`DelaunayTriangulator`] gives identical
/// output for both variants.
///
/// [`DelaunayTriangulator`]: crate::algo::triangulate::DelaunayTriangulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshAlgorithm {
    /// Delaunay triangulation.
    #[default]
    Delaunay,
    /// Adaptive triangulation.
    MeshAdapt,
}

/// A face accepted as a structured quad block.
///
/// `corners[0]` is the lattice origin, `corners[1]` lies along the first
/// lattice direction and `corners[3]` along the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransfiniteFace {
    /// Lattice corners `(0,0)`, `(n1,0)`, `(n1,n2)`, `(0,n2)`.
    pub corners: [PointId; 4],
    /// Sides `c0->c1`, `c1->c2`, `c3->c2`, `c0->c3`, oriented along the lattice.
    pub sides: [SignedEdge; 4],
    /// Subdivisions along the first and second lattice directions.
    pub dims: [usize; 2],
}

/// Transfinite subdivisions, structuring marks and mesh directives for one
/// geometry.
///
/// # Example
///
/// ```
/// use blockmesh::geometry::{primitives, GeometryBuilder};
/// use blockmesh::mesh::MeshConstraints;
///
/// let mut b = GeometryBuilder::new();
/// let rect = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
/// let geometry = b.synchronize();
///
/// let mut constraints = MeshConstraints::new(&geometry);
/// for (edge, n) in rect.edges.iter().zip([10, 5, 10, 5]) {
///     constraints.set_edge_subdivision(*edge, n).unwrap();
/// }
/// constraints.mark_face_transfinite(rect.face, None).unwrap();
/// assert_eq!(constraints.transfinite_face(rect.face).unwrap().dims, [10, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct MeshConstraints<'g> {
    geometry: &'g Geometry,
    edge_counts: HashMap<EdgeId, usize>,
    faces: HashMap<FaceId, TransfiniteFace>,
    face_orderings: HashMap<FaceId, Option<[PointId; 4]>>,
    volumes: BTreeSet<VolumeId>,
    recombine: BTreeSet<EntityRef>,
    algorithms: HashMap<FaceId, MeshAlgorithm>,
    sizes: HashMap<PointId, f64>,
}

impl<'g> MeshConstraints<'g> {
    /// Create an empty constraint set for `geometry`.
    pub fn new(geometry: &'g Geometry) -> Self {
        Self {
            geometry,
            edge_counts: HashMap::new(),
            faces: HashMap::new(),
            face_orderings: HashMap::new(),
            volumes: BTreeSet::new(),
            recombine: BTreeSet::new(),
            algorithms: HashMap::new(),
            sizes: HashMap::new(),
        }
    }

    /// The geometry these constraints apply to.
    pub fn geometry(&self) -> &'g Geometry {
        self.geometry
    }

    /// Require `n` segments along `edge`. `n` must be at least 2.
    ///
    /// Changing the count of an edge already used by a transfinite face or
    /// volume re-validates those entities; on failure nothing changes.
    pub fn set_edge_subdivision(&mut self, edge: EdgeId, n: usize) -> Result<()> {
        self.geometry.require(edge)?;
        if n < 2 {
            return Err(MeshError::Constraint {
                edge: edge.tag(),
                count: n,
            });
        }

        let mut counts = self.edge_counts.clone();
        counts.insert(edge, n);

        let mut faces = self.faces.clone();
        for &f in self.geometry.edge_faces(edge) {
            if let Some(&ordering) = self.face_orderings.get(&f) {
                faces.insert(f, resolve_face(self.geometry, &counts, f, ordering)?);
            }
        }
        for &v in &self.volumes {
            check_volume(self.geometry, &faces, v)?;
        }

        self.edge_counts = counts;
        self.faces = faces;
        Ok(())
    }

    /// Mark a face as a structured quad block.
    ///
    /// The face boundary must have exactly four edges, each with a
    /// subdivision count, and opposite edges must have equal counts.
    /// `corners` optionally picks the lattice origin and direction; it must
    /// list the four loop corners in cyclic order (either direction).
    pub fn mark_face_transfinite(
        &mut self,
        face: FaceId,
        corners: Option<[PointId; 4]>,
    ) -> Result<()> {
        self.geometry.require(face)?;
        let resolved = resolve_face(self.geometry, &self.edge_counts, face, corners)?;

        let mut faces = self.faces.clone();
        faces.insert(face, resolved);
        for &v in &self.volumes {
            check_volume(self.geometry, &faces, v)?;
        }

        self.faces = faces;
        self.face_orderings.insert(face, corners);
        Ok(())
    }

    /// Mark a volume as a structured hex block.
    ///
    /// The shell must have exactly six faces, all already transfinite, with
    /// hexahedral topology and matching dimensions on opposite faces.
    pub fn mark_volume_transfinite(&mut self, volume: VolumeId) -> Result<()> {
        self.geometry.require(volume)?;
        check_volume(self.geometry, &self.faces, volume)?;
        self.volumes.insert(volume);
        Ok(())
    }

    /// Request recombination of a face (triangles into quads) or volume.
    pub fn set_recombine(&mut self, entity: impl Into<EntityRef>) -> Result<()> {
        let entity = entity.into();
        self.geometry.require(entity)?;
        if entity.dim() < 2 {
            return Err(MeshError::invalid_param(
                "entity",
                format!("{:?}", entity),
                "only faces and volumes can be recombined",
            ));
        }
        self.recombine.insert(entity);
        Ok(())
    }

    /// Choose the algorithm used for a free (non-transfinite) face.
    pub fn set_algorithm(&mut self, face: FaceId, algorithm: MeshAlgorithm) -> Result<()> {
        self.geometry.require(face)?;
        self.algorithms.insert(face, algorithm);
        Ok(())
    }

    /// Override the target element size at the given points.
    pub fn set_size(&mut self, points: &[PointId], size: f64) -> Result<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(MeshError::invalid_param("size", size, "must be positive"));
        }
        for &p in points {
            self.geometry.require(p)?;
        }
        for &p in points {
            self.sizes.insert(p, size);
        }
        Ok(())
    }

    /// Subdivision count of an edge, if one was set.
    pub fn edge_subdivision(&self, edge: EdgeId) -> Option<usize> {
        self.edge_counts.get(&edge).copied()
    }

    /// The structured layout of a face, if it is transfinite.
    pub fn transfinite_face(&self, face: FaceId) -> Option<&TransfiniteFace> {
        self.faces.get(&face)
    }

    /// Whether a volume is transfinite.
    pub fn is_volume_transfinite(&self, volume: VolumeId) -> bool {
        self.volumes.contains(&volume)
    }

    /// Whether recombination was requested for `entity`.
    pub fn is_recombined(&self, entity: impl Into<EntityRef>) -> bool {
        self.recombine.contains(&entity.into())
    }

    /// Algorithm for a free face.
    pub fn algorithm(&self, face: FaceId) -> MeshAlgorithm {
        self.algorithms.get(&face).copied().unwrap_or_default()
    }

    /// Target size at a point: the override, else the point's own size.
    pub fn point_size(&self, point: PointId) -> Option<f64> {
        self.sizes
            .get(&point)
            .copied()
            .or(self.geometry.point(point).size)
    }
}

/// Validate a face against the quad-block precondition and fix its lattice.
fn resolve_face(
    geometry: &Geometry,
    counts: &HashMap<EdgeId, usize>,
    face: FaceId,
    ordering: Option<[PointId; 4]>,
) -> Result<TransfiniteFace> {
    let edges = geometry.face_edges(face);
    if edges.len() != 4 {
        return Err(MeshError::structuring(
            face,
            format!("boundary has {} edges, expected 4", edges.len()),
        ));
    }
    let loop_corners = geometry.face_corners(face);

    let corners = match ordering {
        None => [loop_corners[0], loop_corners[1], loop_corners[2], loop_corners[3]],
        Some(c) => {
            let start = loop_corners.iter().position(|&p| p == c[0]).ok_or_else(|| {
                MeshError::structuring(face, format!("{:?} is not a corner of the face", c[0]))
            })?;
            let forward: Vec<PointId> = (0..4).map(|k| loop_corners[(start + k) % 4]).collect();
            let backward: Vec<PointId> = (0..4).map(|k| loop_corners[(start + 4 - k) % 4]).collect();
            if c[..] != forward[..] && c[..] != backward[..] {
                return Err(MeshError::structuring(
                    face,
                    format!("corner ordering {:?} does not follow the boundary loop", c),
                ));
            }
            c
        }
    };

    let side = |a: PointId, b: PointId| -> Result<(SignedEdge, usize)> {
        let s = geometry.face_edge_between(face, a, b).ok_or_else(|| {
            MeshError::structuring(face, format!("no edge joins {:?} and {:?}", a, b))
        })?;
        let n = counts.get(&s.edge).copied().ok_or_else(|| {
            MeshError::structuring(face, format!("edge {:?} has no subdivision count", s.edge))
        })?;
        Ok((s, n))
    };

    let (bottom, n_bottom) = side(corners[0], corners[1])?;
    let (right, n_right) = side(corners[1], corners[2])?;
    let (top, n_top) = side(corners[3], corners[2])?;
    let (left, n_left) = side(corners[0], corners[3])?;

    if n_bottom != n_top || n_left != n_right {
        return Err(MeshError::structuring(
            face,
            format!(
                "opposite subdivision counts differ ({} vs {}, {} vs {})",
                n_bottom, n_top, n_left, n_right
            ),
        ));
    }

    Ok(TransfiniteFace {
        corners,
        sides: [bottom, right, top, left],
        dims: [n_bottom, n_left],
    })
}

/// Check the hex-block precondition for a volume.
fn check_volume(
    geometry: &Geometry,
    faces: &HashMap<FaceId, TransfiniteFace>,
    volume: VolumeId,
) -> Result<()> {
    let shell = geometry.volume_faces(volume);
    if shell.len() != 6 {
        return Err(MeshError::structuring(
            volume,
            format!("shell has {} faces, expected 6", shell.len()),
        ));
    }
    for f in shell {
        if !faces.contains_key(f) {
            return Err(MeshError::structuring(
                volume,
                format!("face {:?} is not transfinite", f),
            ));
        }
    }
    let points = geometry.volume_points(volume);
    let edges = geometry.volume_edges(volume);
    if points.len() != 8 || edges.len() != 12 {
        return Err(MeshError::structuring(
            volume,
            format!(
                "shell has {} corners and {} edges, expected 8 and 12",
                points.len(),
                edges.len()
            ),
        ));
    }

    let corner_sets: Vec<BTreeSet<PointId>> = shell
        .iter()
        .map(|&f| geometry.face_corners(f).into_iter().collect())
        .collect();
    for (i, &f) in shell.iter().enumerate() {
        let opposite: Vec<usize> = (0..6)
            .filter(|&j| j != i && corner_sets[i].is_disjoint(&corner_sets[j]))
            .collect();
        if opposite.len() != 1 {
            return Err(MeshError::structuring(
                volume,
                format!("face {:?} has no unique opposite face", f),
            ));
        }
        let mut a = faces[&f].dims;
        let mut b = faces[&shell[opposite[0]]].dims;
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return Err(MeshError::structuring(
                volume,
                format!(
                    "faces {:?} and {:?} are opposite but structured {:?} vs {:?}",
                    f, shell[opposite[0]], a, b
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{primitives, GeometryBuilder};

    fn rectangle() -> (Geometry, primitives::Rectangle) {
        let mut b = GeometryBuilder::new();
        let r = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
        (b.synchronize(), r)
    }

    #[test]
    fn test_subdivision_lower_bound() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        assert!(matches!(
            c.set_edge_subdivision(r.edges[0], 1),
            Err(MeshError::Constraint { count: 1, .. })
        ));
        assert!(c.set_edge_subdivision(r.edges[0], 2).is_ok());
    }

    #[test]
    fn test_mismatched_opposite_counts() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        for (e, n) in r.edges.iter().zip([10, 5, 8, 5]) {
            c.set_edge_subdivision(*e, n).unwrap();
        }
        assert!(matches!(
            c.mark_face_transfinite(r.face, None),
            Err(MeshError::Structuring { .. })
        ));
        assert!(c.transfinite_face(r.face).is_none());
    }

    #[test]
    fn test_missing_count_rejected() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        c.set_edge_subdivision(r.edges[0], 4).unwrap();
        assert!(c.mark_face_transfinite(r.face, None).is_err());
    }

    fn polygon(sides: usize) -> (Geometry, FaceId, Vec<EdgeId>) {
        let mut b = GeometryBuilder::new();
        let points: Vec<PointId> = (0..sides)
            .map(|k| {
                let t = std::f64::consts::TAU * k as f64 / sides as f64;
                b.add_point(nalgebra::Point3::new(t.cos(), t.sin(), 0.0), None).unwrap()
            })
            .collect();
        let edges: Vec<EdgeId> = (0..sides)
            .map(|k| b.add_edge(points[k], points[(k + 1) % sides]).unwrap())
            .collect();
        let signed: Vec<SignedEdge> = edges.iter().map(|&e| e.into()).collect();
        let cl = b.add_curve_loop(&signed).unwrap();
        let face = b.add_face(cl, &[]).unwrap();
        (b.synchronize(), face, edges)
    }

    #[test]
    fn test_non_quad_boundary_rejected() {
        for sides in [3, 5] {
            let (g, face, edges) = polygon(sides);
            let mut c = MeshConstraints::new(&g);
            for e in edges {
                c.set_edge_subdivision(e, 4).unwrap();
            }
            assert!(matches!(
                c.mark_face_transfinite(face, None),
                Err(MeshError::Structuring { .. })
            ));
            assert!(c.transfinite_face(face).is_none());
        }
    }

    #[test]
    fn test_corner_ordering() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        for (e, n) in r.edges.iter().zip([10, 5, 10, 5]) {
            c.set_edge_subdivision(*e, n).unwrap();
        }
        let [p1, p2, p3, p4] = r.corners;
        c.mark_face_transfinite(r.face, Some([p2, p3, p4, p1])).unwrap();
        let tf = c.transfinite_face(r.face).unwrap();
        assert_eq!(tf.dims, [5, 10]);
        assert_eq!(tf.sides[0], SignedEdge::forward(r.edges[1]));

        // Not a cyclic ordering of the loop
        assert!(c.mark_face_transfinite(r.face, Some([p1, p3, p2, p4])).is_err());
    }

    #[test]
    fn test_recount_breaking_face_is_rejected() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        for (e, n) in r.edges.iter().zip([10, 5, 10, 5]) {
            c.set_edge_subdivision(*e, n).unwrap();
        }
        c.mark_face_transfinite(r.face, None).unwrap();
        assert!(c.set_edge_subdivision(r.edges[0], 12).is_err());
        assert_eq!(c.edge_subdivision(r.edges[0]), Some(10));
    }

    #[test]
    fn test_volume_requires_transfinite_faces() {
        let mut b = GeometryBuilder::new();
        let cube = primitives::cuboid(&mut b, 1.0, 1.0, 1.0, None).unwrap();
        let g = b.synchronize();
        let mut c = MeshConstraints::new(&g);
        for e in cube.edges {
            c.set_edge_subdivision(e, 3).unwrap();
        }
        for f in &cube.faces[..5] {
            c.mark_face_transfinite(*f, None).unwrap();
        }
        assert!(matches!(
            c.mark_volume_transfinite(cube.volume),
            Err(MeshError::Structuring { .. })
        ));
        c.mark_face_transfinite(cube.faces[5], None).unwrap();
        c.mark_volume_transfinite(cube.volume).unwrap();
        assert!(c.is_volume_transfinite(cube.volume));
    }

    #[test]
    fn test_recombine_rejects_edges() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        assert!(c.set_recombine(r.edges[0]).is_err());
        c.set_recombine(r.face).unwrap();
        assert!(c.is_recombined(r.face));
    }

    #[test]
    fn test_size_override() {
        let (g, r) = rectangle();
        let mut c = MeshConstraints::new(&g);
        assert_eq!(c.point_size(r.corners[0]), None);
        c.set_size(&r.corners, 0.25).unwrap();
        assert_eq!(c.point_size(r.corners[0]), Some(0.25));
        assert!(c.set_size(&r.corners, -1.0).is_err());
    }
}
