//! Geometry model: points, straight edges, curve loops, faces, surface loops
//! and volumes.
//!
//! Entities are created in dependency order through a [`GeometryBuilder`] and
//! then frozen with [`GeometryBuilder::synchronize`]. The resulting
//! [`Geometry`] is read-only; mesh directives and physical groups attach to it.

use std::collections::{BTreeSet, HashMap, HashSet};

use nalgebra::Point3;

use super::index::{CurveLoopId, EdgeId, EntityRef, FaceId, PointId, SignedEdge, SurfaceLoopId, VolumeId};
use crate::error::{MeshError, Result};

/// A corner point with an optional target element size.
#[derive(Debug, Clone)]
pub struct Point {
    /// Position of the point.
    pub position: Point3<f64>,
    /// Target element size near this point.
    pub size: Option<f64>,
}

/// A straight edge from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// First endpoint.
    pub start: PointId,
    /// Second endpoint.
    pub end: PointId,
}

/// A closed, ordered sequence of signed edges.
#[derive(Debug, Clone)]
pub struct CurveLoop {
    /// The edges in traversal order.
    pub edges: Vec<SignedEdge>,
}

/// A face bounded by one outer curve loop.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// The outer boundary.
    pub boundary: CurveLoopId,
}

/// A closed shell of faces.
#[derive(Debug, Clone)]
pub struct SurfaceLoop {
    /// The faces of the shell.
    pub faces: Vec<FaceId>,
}

/// A volume enclosed by one surface loop.
#[derive(Debug, Clone, Copy)]
pub struct Volume {
    /// The enclosing shell.
    pub shell: SurfaceLoopId,
}

#[derive(Debug, Clone, Default)]
struct Entities {
    points: Vec<Point>,
    edges: Vec<Edge>,
    loops: Vec<CurveLoop>,
    faces: Vec<Face>,
    shells: Vec<SurfaceLoop>,
    volumes: Vec<Volume>,
}

impl Entities {
    fn edge_first(&self, s: SignedEdge) -> PointId {
        let e = &self.edges[s.edge.index()];
        if s.reversed {
            e.end
        } else {
            e.start
        }
    }

    fn edge_last(&self, s: SignedEdge) -> PointId {
        let e = &self.edges[s.edge.index()];
        if s.reversed {
            e.start
        } else {
            e.end
        }
    }
}

/// Mutable geometry under construction.
///
/// # Example
///
/// ```
/// use blockmesh::geometry::GeometryBuilder;
/// use nalgebra::Point3;
///
/// let mut b = GeometryBuilder::new();
/// let p1 = b.add_point(Point3::new(0.0, 0.0, 0.0), None).unwrap();
/// let p2 = b.add_point(Point3::new(1.0, 0.0, 0.0), None).unwrap();
/// let p3 = b.add_point(Point3::new(0.0, 1.0, 0.0), None).unwrap();
/// let e1 = b.add_edge(p1, p2).unwrap();
/// let e2 = b.add_edge(p2, p3).unwrap();
/// let e3 = b.add_edge(p3, p1).unwrap();
/// let cl = b.add_curve_loop(&[e1.into(), e2.into(), e3.into()]).unwrap();
/// let face = b.add_face(cl, &[]).unwrap();
///
/// let geometry = b.synchronize();
/// assert_eq!(geometry.face_corners(face).len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    entities: Entities,
}

impl GeometryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point with an optional target element size.
    pub fn add_point(&mut self, position: Point3<f64>, size: Option<f64>) -> Result<PointId> {
        if !position.coords.iter().all(|c| c.is_finite()) {
            return Err(MeshError::invalid_param(
                "position",
                format!("{:?}", position),
                "coordinates must be finite",
            ));
        }
        if let Some(s) = size {
            if !(s.is_finite() && s > 0.0) {
                return Err(MeshError::invalid_param("size", s, "must be positive"));
            }
        }
        let id = PointId::new(self.entities.points.len());
        self.entities.points.push(Point { position, size });
        Ok(id)
    }

    /// Add a straight edge from `start` to `end`.
    pub fn add_edge(&mut self, start: PointId, end: PointId) -> Result<EdgeId> {
        for p in [start, end] {
            if p.index() >= self.entities.points.len() {
                return Err(MeshError::unknown(p));
            }
        }
        if start == end {
            return Err(MeshError::Topology(format!(
                "edge endpoints coincide ({:?})",
                start
            )));
        }
        let a = self.entities.points[start.index()].position;
        let b = self.entities.points[end.index()].position;
        if (b - a).norm() == 0.0 {
            return Err(MeshError::Topology(format!(
                "edge {:?} -> {:?} has zero length",
                start, end
            )));
        }
        let id = EdgeId::new(self.entities.edges.len());
        self.entities.edges.push(Edge { start, end });
        Ok(id)
    }

    /// Add a closed loop of signed edges.
    ///
    /// Fails with [`MeshError::Topology`] unless every edge starts where the
    /// previous one ends and the last edge ends where the first one starts.
    pub fn add_curve_loop(&mut self, edges: &[SignedEdge]) -> Result<CurveLoopId> {
        if edges.len() < 3 {
            return Err(MeshError::Topology(format!(
                "curve loop needs at least 3 edges, got {}",
                edges.len()
            )));
        }
        let mut seen = HashSet::new();
        for s in edges {
            if s.edge.index() >= self.entities.edges.len() {
                return Err(MeshError::unknown(s.edge));
            }
            if !seen.insert(s.edge) {
                return Err(MeshError::Topology(format!(
                    "edge {:?} appears twice in curve loop",
                    s.edge
                )));
            }
        }
        for (i, &s) in edges.iter().enumerate() {
            let next = edges[(i + 1) % edges.len()];
            let end = self.entities.edge_last(s);
            let start = self.entities.edge_first(next);
            if end != start {
                return Err(MeshError::Topology(format!(
                    "curve loop is not closed: {:?} ends at {:?} but {:?} starts at {:?}",
                    s, end, next, start
                )));
            }
        }
        let id = CurveLoopId::new(self.entities.loops.len());
        self.entities.loops.push(CurveLoop {
            edges: edges.to_vec(),
        });
        Ok(id)
    }

    /// Add a face bounded by `boundary`. Holes are not supported.
    pub fn add_face(&mut self, boundary: CurveLoopId, holes: &[CurveLoopId]) -> Result<FaceId> {
        if boundary.index() >= self.entities.loops.len() {
            return Err(MeshError::unknown(boundary));
        }
        if !holes.is_empty() {
            return Err(MeshError::Unsupported(format!(
                "faces with holes ({} given)",
                holes.len()
            )));
        }
        let id = FaceId::new(self.entities.faces.len());
        self.entities.faces.push(Face { boundary });
        Ok(id)
    }

    /// Add a closed shell of faces.
    ///
    /// Fails with [`MeshError::Topology`] unless every boundary edge of the
    /// faces is shared by exactly two of them.
    pub fn add_surface_loop(&mut self, faces: &[FaceId]) -> Result<SurfaceLoopId> {
        if faces.is_empty() {
            return Err(MeshError::Topology("surface loop has no faces".to_string()));
        }
        let mut seen = HashSet::new();
        let mut uses: HashMap<EdgeId, usize> = HashMap::new();
        for &f in faces {
            if f.index() >= self.entities.faces.len() {
                return Err(MeshError::unknown(f));
            }
            if !seen.insert(f) {
                return Err(MeshError::Topology(format!(
                    "face {:?} appears twice in surface loop",
                    f
                )));
            }
            let cl = self.entities.faces[f.index()].boundary;
            for s in &self.entities.loops[cl.index()].edges {
                *uses.entry(s.edge).or_insert(0) += 1;
            }
        }
        let mut open: Vec<(EdgeId, usize)> = uses.into_iter().filter(|&(_, n)| n != 2).collect();
        if !open.is_empty() {
            open.sort();
            let (edge, n) = open[0];
            return Err(MeshError::Topology(format!(
                "surface loop is not watertight: edge {:?} is shared by {} faces",
                edge, n
            )));
        }
        let id = SurfaceLoopId::new(self.entities.shells.len());
        self.entities.shells.push(SurfaceLoop {
            faces: faces.to_vec(),
        });
        Ok(id)
    }

    /// Add a volume enclosed by `shell`.
    pub fn add_volume(&mut self, shell: SurfaceLoopId) -> Result<VolumeId> {
        if shell.index() >= self.entities.shells.len() {
            return Err(MeshError::unknown(shell));
        }
        let id = VolumeId::new(self.entities.volumes.len());
        self.entities.volumes.push(Volume { shell });
        Ok(id)
    }

    /// Freeze the model. No entity can be added afterwards.
    pub fn synchronize(self) -> Geometry {
        let mut edge_faces: HashMap<EdgeId, Vec<FaceId>> = HashMap::new();
        for (i, face) in self.entities.faces.iter().enumerate() {
            for s in &self.entities.loops[face.boundary.index()].edges {
                edge_faces.entry(s.edge).or_default().push(FaceId::new(i));
            }
        }
        Geometry {
            entities: self.entities,
            edge_faces,
        }
    }
}

/// A frozen geometry model.
#[derive(Debug, Clone)]
pub struct Geometry {
    entities: Entities,
    edge_faces: HashMap<EdgeId, Vec<FaceId>>,
}

impl Geometry {
    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.entities.points.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.entities.edges.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.entities.faces.len()
    }

    /// Number of volumes.
    pub fn num_volumes(&self) -> usize {
        self.entities.volumes.len()
    }

    /// Get a point. Panics on an id from another model.
    pub fn point(&self, id: PointId) -> &Point {
        &self.entities.points[id.index()]
    }

    /// Get an edge.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.entities.edges[id.index()]
    }

    /// Get a curve loop.
    pub fn curve_loop(&self, id: CurveLoopId) -> &CurveLoop {
        &self.entities.loops[id.index()]
    }

    /// Get a face.
    pub fn face(&self, id: FaceId) -> &Face {
        &self.entities.faces[id.index()]
    }

    /// Get a surface loop.
    pub fn surface_loop(&self, id: SurfaceLoopId) -> &SurfaceLoop {
        &self.entities.shells[id.index()]
    }

    /// Get a volume.
    pub fn volume(&self, id: VolumeId) -> &Volume {
        &self.entities.volumes[id.index()]
    }

    /// Position of a point.
    #[inline]
    pub fn position(&self, id: PointId) -> Point3<f64> {
        self.entities.points[id.index()].position
    }

    /// Iterate over point ids.
    pub fn point_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        (0..self.entities.points.len()).map(PointId::new)
    }

    /// Iterate over edge ids.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.entities.edges.len()).map(EdgeId::new)
    }

    /// Iterate over face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.entities.faces.len()).map(FaceId::new)
    }

    /// Iterate over volume ids.
    pub fn volume_ids(&self) -> impl Iterator<Item = VolumeId> + '_ {
        (0..self.entities.volumes.len()).map(VolumeId::new)
    }

    /// Whether `entity` exists in this model.
    pub fn contains(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Point(id) => id.index() < self.entities.points.len(),
            EntityRef::Edge(id) => id.index() < self.entities.edges.len(),
            EntityRef::Face(id) => id.index() < self.entities.faces.len(),
            EntityRef::Volume(id) => id.index() < self.entities.volumes.len(),
        }
    }

    /// Fail with [`MeshError::UnknownEntity`] if `entity` is not in the model.
    pub fn require(&self, entity: impl Into<EntityRef>) -> Result<()> {
        let entity = entity.into();
        if self.contains(entity) {
            Ok(())
        } else {
            Err(MeshError::unknown(entity))
        }
    }

    /// The point a signed edge starts from.
    pub fn first_point(&self, s: SignedEdge) -> PointId {
        self.entities.edge_first(s)
    }

    /// The point a signed edge ends at.
    pub fn last_point(&self, s: SignedEdge) -> PointId {
        self.entities.edge_last(s)
    }

    /// Length of an edge.
    pub fn edge_length(&self, id: EdgeId) -> f64 {
        let e = self.edge(id);
        (self.position(e.end) - self.position(e.start)).norm()
    }

    /// The signed boundary edges of a face, in loop order.
    pub fn face_edges(&self, face: FaceId) -> &[SignedEdge] {
        &self.curve_loop(self.face(face).boundary).edges
    }

    /// The corners of a face in loop order (the start point of each edge).
    pub fn face_corners(&self, face: FaceId) -> Vec<PointId> {
        self.face_edges(face)
            .iter()
            .map(|&s| self.first_point(s))
            .collect()
    }

    /// Faces whose boundary uses `edge`.
    pub fn edge_faces(&self, edge: EdgeId) -> &[FaceId] {
        self.edge_faces.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The faces of a volume's shell.
    pub fn volume_faces(&self, volume: VolumeId) -> &[FaceId] {
        &self.surface_loop(self.volume(volume).shell).faces
    }

    /// All distinct edges on a volume's shell, sorted by id.
    pub fn volume_edges(&self, volume: VolumeId) -> Vec<EdgeId> {
        let edges: BTreeSet<EdgeId> = self
            .volume_faces(volume)
            .iter()
            .flat_map(|&f| self.face_edges(f).iter().map(|s| s.edge))
            .collect();
        edges.into_iter().collect()
    }

    /// All distinct corner points of a volume's shell, sorted by id.
    pub fn volume_points(&self, volume: VolumeId) -> Vec<PointId> {
        let points: BTreeSet<PointId> = self
            .volume_edges(volume)
            .into_iter()
            .flat_map(|e| {
                let edge = self.edge(e);
                [edge.start, edge.end]
            })
            .collect();
        points.into_iter().collect()
    }

    /// Find the edge of `face` joining two of its corners, oriented `a -> b`.
    pub fn face_edge_between(&self, face: FaceId, a: PointId, b: PointId) -> Option<SignedEdge> {
        self.face_edges(face).iter().find_map(|s| {
            let e = self.edge(s.edge);
            if e.start == a && e.end == b {
                Some(SignedEdge::forward(s.edge))
            } else if e.start == b && e.end == a {
                Some(SignedEdge::backward(s.edge))
            } else {
                None
            }
        })
    }
}
