//! Mesh generation.
//!
//! One pass walks the geometry bottom-up: points, then edges, faces and
//! volumes, each in id order. Every stage registers its nodes in a single
//! [`NodeIndex`], so an entity shared by two blocks is discretised once and
//! both blocks reference the same node ids.
//!
//! - Edges are split into equal segments: the transfinite count if one was
//!   set, otherwise a count derived from the target sizes at their ends.
//! - Transfinite faces are filled with a Coons patch and emit quadrangles.
//! - Free faces go through the [`Triangulator`] and, when requested, the
//!   recombination pass.
//! - Transfinite volumes reuse their six face grids and emit hexahedra.
//!
//! Interior lattice positions may be interpolated in parallel; node ids are
//! always assigned sequentially, so the output does not depend on
//! [`MeshOptions::parallel`].

use std::collections::HashMap;
use std::time::Instant;

use nalgebra::Point3;

use super::block::{FaceGrid, HexFrame};
use super::constraints::{MeshConstraints, TransfiniteFace};
use super::element::{Element, ElementKind};
use super::index::NodeId;
use super::node_index::{NodeIndex, NodeKey};
use super::options::MeshOptions;
use super::output::Mesh;
use super::physical::PhysicalGroups;
use crate::algo::progress::Progress;
use crate::algo::recombine::recombine_triangles;
use crate::algo::transfinite::{segment_point, Lattice2, Lattice3};
use crate::algo::triangulate::{DelaunayTriangulator, PlaneFrame, Triangulator};
use crate::error::{MeshError, Result};
use crate::geometry::{EdgeId, FaceId, Geometry, PointId, SignedEdge, VolumeId};

/// Generates a [`Mesh`] from a constrained geometry.
///
/// # Example
///
/// ```
/// use blockmesh::geometry::{primitives, GeometryBuilder};
/// use blockmesh::mesh::{ElementKind, MeshConstraints, MeshGenerator};
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
///
/// let mesh = MeshGenerator::new(&constraints).generate().unwrap();
/// assert_eq!(mesh.count(ElementKind::Quadrangle), 50);
/// assert_eq!(mesh.num_nodes(), 66);
/// ```
#[derive(Debug)]
pub struct MeshGenerator<'a> {
    constraints: &'a MeshConstraints<'a>,
    groups: Option<&'a PhysicalGroups<'a>>,
    options: MeshOptions,
    triangulator: Box<dyn Triangulator + 'a>,
}

impl<'a> MeshGenerator<'a> {
    /// Create a generator for `constraints` with default options.
    pub fn new(constraints: &'a MeshConstraints<'a>) -> Self {
        Self {
            constraints,
            groups: None,
            options: MeshOptions::default(),
            triangulator: Box::new(DelaunayTriangulator::new()),
        }
    }

    /// Tag the output with physical groups defined on the same geometry.
    pub fn with_groups(mut self, groups: &'a PhysicalGroups<'a>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Set the generation options.
    pub fn with_options(mut self, options: MeshOptions) -> Self {
        self.options = options;
        self
    }

    /// Use another triangulator for free faces.
    pub fn with_triangulator(mut self, triangulator: impl Triangulator + 'a) -> Self {
        self.triangulator = Box::new(triangulator);
        self
    }

    /// Generate the mesh.
    pub fn generate(&self) -> Result<Mesh> {
        self.generate_with_progress(&Progress::none())
    }

    /// Generate the mesh, reporting progress once per meshed entity.
    pub fn generate_with_progress(&self, progress: &Progress) -> Result<Mesh> {
        let geometry = self.constraints.geometry();
        if let Some(groups) = self.groups {
            if !std::ptr::eq(groups.geometry(), geometry) {
                return Err(MeshError::invalid_param(
                    "groups",
                    "PhysicalGroups",
                    "physical groups must be defined on the constrained geometry",
                ));
            }
        }
        let h = self.options.characteristic_length;
        if !(h.is_finite() && h > 0.0) {
            return Err(MeshError::invalid_param(
                "characteristic_length",
                h,
                "must be positive",
            ));
        }
        if self.options.dimension > 3 {
            return Err(MeshError::invalid_param(
                "dimension",
                self.options.dimension,
                "must be 0, 1, 2 or 3",
            ));
        }

        let start = Instant::now();
        let mut pass = Pass {
            geometry,
            constraints: self.constraints,
            options: &self.options,
            triangulator: self.triangulator.as_ref(),
            index: NodeIndex::new(),
            elements: Vec::new(),
            edge_nodes: HashMap::new(),
            face_grids: HashMap::new(),
        };

        let dim = self.options.dimension;
        let points: Vec<PointId> = geometry.point_ids().collect();
        for (n, &p) in points.iter().enumerate() {
            pass.mesh_point(p);
            progress.report_stage(0, n + 1, points.len(), "Meshing points");
        }
        if dim >= 1 {
            let edges: Vec<EdgeId> = geometry.edge_ids().collect();
            for (n, &e) in edges.iter().enumerate() {
                pass.mesh_edge(e);
                progress.report_stage(1, n + 1, edges.len(), "Meshing edges");
            }
        }
        if dim >= 2 {
            let faces: Vec<FaceId> = geometry.face_ids().collect();
            for (n, &f) in faces.iter().enumerate() {
                match self.constraints.transfinite_face(f) {
                    Some(tf) => pass.mesh_structured_face(f, tf),
                    None => pass.mesh_free_face(f)?,
                }
                progress.report_stage(2, n + 1, faces.len(), "Meshing faces");
            }
        }
        if dim >= 3 {
            let volumes: Vec<VolumeId> = geometry.volume_ids().collect();
            for (n, &v) in volumes.iter().enumerate() {
                pass.mesh_volume(v)?;
                progress.report_stage(3, n + 1, volumes.len(), "Meshing volumes");
            }
        }

        progress.report(Progress::STAGE_TOTAL, Progress::STAGE_TOTAL, "Done");

        let groups = self.groups.map(|g| g.to_vec()).unwrap_or_default();
        let mesh = Mesh::new(pass.index.into_positions(), pass.elements, groups);
        log::info!(
            "Generated {} nodes, {} elements ({} quadrangles, {} triangles, {} hexahedra) in {:.2?}",
            mesh.num_nodes(),
            mesh.num_elements(),
            mesh.count(ElementKind::Quadrangle),
            mesh.count(ElementKind::Triangle),
            mesh.count(ElementKind::Hexahedron),
            start.elapsed()
        );
        Ok(mesh)
    }
}

/// Mutable state of one generation pass.
struct Pass<'p> {
    geometry: &'p Geometry,
    constraints: &'p MeshConstraints<'p>,
    options: &'p MeshOptions,
    triangulator: &'p dyn Triangulator,
    index: NodeIndex,
    elements: Vec<Element>,
    /// Nodes of each edge from its start point to its end point.
    edge_nodes: HashMap<EdgeId, Vec<NodeId>>,
    face_grids: HashMap<FaceId, FaceGrid>,
}

impl Pass<'_> {
    fn mesh_point(&mut self, p: PointId) {
        let node = self
            .index
            .get_or_insert(NodeKey::Point(p), self.geometry.position(p));
        self.elements
            .push(Element::new(ElementKind::Point, vec![node], p.into()));
    }

    /// Target size at a point: override, point size, then the fallback.
    fn size_at(&self, p: PointId) -> f64 {
        self.constraints
            .point_size(p)
            .unwrap_or(self.options.characteristic_length)
    }

    fn edge_count(&self, e: EdgeId) -> usize {
        if let Some(n) = self.constraints.edge_subdivision(e) {
            return n;
        }
        let edge = self.geometry.edge(e);
        let h = 0.5 * (self.size_at(edge.start) + self.size_at(edge.end));
        ((self.geometry.edge_length(e) / h).round() as usize).max(1)
    }

    fn mesh_edge(&mut self, e: EdgeId) {
        let count = self.edge_count(e);
        let edge = self.geometry.edge(e);
        let a = self.geometry.position(edge.start);
        let b = self.geometry.position(edge.end);

        let mut nodes = Vec::with_capacity(count + 1);
        nodes.push(self.index.get_or_insert(NodeKey::Point(edge.start), a));
        for k in 1..count {
            nodes.push(
                self.index
                    .get_or_insert(NodeKey::Edge(e, k), segment_point(&a, &b, k, count)),
            );
        }
        nodes.push(self.index.get_or_insert(NodeKey::Point(edge.end), b));

        for pair in nodes.windows(2) {
            self.elements
                .push(Element::new(ElementKind::Line, pair.to_vec(), e.into()));
        }
        log::debug!("Meshed {:?}: {} segments", e, count);
        self.edge_nodes.insert(e, nodes);
    }

    /// Nodes along a signed edge, in traversal order.
    fn side_nodes(&self, s: SignedEdge) -> Vec<NodeId> {
        let mut nodes = self.edge_nodes[&s.edge].clone();
        if s.reversed {
            nodes.reverse();
        }
        nodes
    }

    fn mesh_structured_face(&mut self, f: FaceId, tf: &TransfiniteFace) {
        let [n1, n2] = tf.dims;
        let bottom = self.side_nodes(tf.sides[0]);
        let right = self.side_nodes(tf.sides[1]);
        let top = self.side_nodes(tf.sides[2]);
        let left = self.side_nodes(tf.sides[3]);

        let mut lattice = Lattice2::new(tf.dims);
        let mut nodes = vec![NodeId::new(0); (n1 + 1) * (n2 + 1)];
        let mut put = |i: usize, j: usize, node: NodeId, lattice: &mut Lattice2| {
            nodes[lattice.index(i, j)] = node;
            lattice.set(i, j, self.index.position(node));
        };
        for i in 0..=n1 {
            put(i, 0, bottom[i], &mut lattice);
            put(i, n2, top[i], &mut lattice);
        }
        for j in 0..=n2 {
            put(0, j, left[j], &mut lattice);
            put(n1, j, right[j], &mut lattice);
        }

        lattice.fill_interior(self.options.parallel);
        for j in 1..n2 {
            for i in 1..n1 {
                nodes[lattice.index(i, j)] = self
                    .index
                    .get_or_insert(NodeKey::Face(f, i, j), lattice.get(i, j));
            }
        }

        // Quads follow the boundary loop's orientation
        let loop_corners = self.geometry.face_corners(f);
        let forward = loop_corners
            .iter()
            .position(|&p| p == tf.corners[0])
            .map(|k| loop_corners[(k + 1) % 4] == tf.corners[1])
            .unwrap_or(true);

        let grid = FaceGrid {
            corners: tf.corners,
            dims: tf.dims,
            nodes,
        };
        for j in 0..n2 {
            for i in 0..n1 {
                let quad = if forward {
                    [grid.node(i, j), grid.node(i + 1, j), grid.node(i + 1, j + 1), grid.node(i, j + 1)]
                } else {
                    [grid.node(i, j), grid.node(i, j + 1), grid.node(i + 1, j + 1), grid.node(i + 1, j)]
                };
                self.elements
                    .push(Element::new(ElementKind::Quadrangle, quad.to_vec(), f.into()));
            }
        }
        log::debug!("Meshed {:?}: {}x{} structured quadrangles", f, n1, n2);
        self.face_grids.insert(f, grid);
    }

    fn mesh_free_face(&mut self, f: FaceId) -> Result<()> {
        let mut boundary = Vec::new();
        for &s in self.geometry.face_edges(f) {
            let nodes = self.side_nodes(s);
            boundary.extend_from_slice(&nodes[..nodes.len() - 1]);
        }
        let positions: Vec<Point3<f64>> = boundary.iter().map(|&n| self.index.position(n)).collect();

        let frame = PlaneFrame::from_polygon(&positions)?;
        let extent = positions
            .iter()
            .map(|p| (p - positions[0]).norm())
            .fold(0.0, f64::max);
        if positions.iter().any(|p| frame.offset(p).abs() > 1e-9 * extent) {
            return Err(MeshError::Unsupported(format!(
                "free face {:?} is not planar",
                f
            )));
        }
        let projected: Vec<_> = positions.iter().map(|p| frame.project(p)).collect();

        let perimeter: f64 = (0..positions.len())
            .map(|k| (positions[(k + 1) % positions.len()] - positions[k]).norm())
            .sum();
        let size = perimeter / positions.len() as f64;

        log::debug!(
            "Triangulating {:?} with {:?}, {} boundary nodes, size {:.4}",
            f,
            self.constraints.algorithm(f),
            boundary.len(),
            size
        );
        let triangulation = self.triangulator.triangulate(&projected, size)?;

        let mut local = boundary;
        for (k, q) in triangulation.interior.iter().enumerate() {
            local.push(self.index.get_or_insert(NodeKey::FreeFace(f, k), frame.lift(q)));
        }
        if let Some(bad) = triangulation
            .triangles
            .iter()
            .find(|t| t.iter().any(|&v| v >= local.len()))
        {
            return Err(MeshError::Unsupported(format!(
                "triangulator returned triangle {:?} outside the {} nodes of {:?}",
                bad,
                local.len(),
                f
            )));
        }

        if self.constraints.is_recombined(f) {
            let points: Vec<Point3<f64>> = local.iter().map(|&n| self.index.position(n)).collect();
            let merged = recombine_triangles(
                &points,
                &triangulation.triangles,
                &frame.normal(),
                &self.options.recombine,
            );
            for q in &merged.quads {
                let nodes = q.iter().map(|&v| local[v]).collect();
                self.elements
                    .push(Element::new(ElementKind::Quadrangle, nodes, f.into()));
            }
            for t in &merged.triangles {
                let nodes = t.iter().map(|&v| local[v]).collect();
                self.elements
                    .push(Element::new(ElementKind::Triangle, nodes, f.into()));
            }
            if !merged.triangles.is_empty() {
                log::warn!(
                    "{:?}: {} triangles left unpaired after recombination",
                    f,
                    merged.triangles.len()
                );
            }
        } else {
            for t in &triangulation.triangles {
                let nodes = t.iter().map(|&v| local[v]).collect();
                self.elements
                    .push(Element::new(ElementKind::Triangle, nodes, f.into()));
            }
        }
        Ok(())
    }

    fn mesh_volume(&mut self, v: VolumeId) -> Result<()> {
        if !self.constraints.is_volume_transfinite(v) {
            return Err(MeshError::Unsupported(format!(
                "{:?} is not transfinite; unstructured volume meshing is not available",
                v
            )));
        }
        let shell = self.geometry.volume_faces(v);
        let grid_of = |f: FaceId| {
            self.face_grids
                .get(&f)
                .ok_or_else(|| MeshError::structuring(v, format!("face {:?} has no structured grid", f)))
        };
        let frame = HexFrame::new(self.geometry, self.constraints, v, grid_of(shell[0])?.corners)?;
        let [n1, n2, n3] = frame.dims;

        let mut lattice = Lattice3::new(frame.dims);
        let mut nodes = vec![None; (n1 + 1) * (n2 + 1) * (n3 + 1)];
        for &f in shell {
            frame.map_face(f, grid_of(f)?, |[i, j, k], node| {
                nodes[lattice.index(i, j, k)] = Some(node);
            })?;
        }
        for k in 0..=n3 {
            for j in 0..=n2 {
                for i in 0..=n1 {
                    if !lattice.is_boundary(i, j, k) {
                        continue;
                    }
                    let node = nodes[lattice.index(i, j, k)].ok_or_else(|| {
                        MeshError::structuring(v, format!("lattice node ({}, {}, {}) is not on any face", i, j, k))
                    })?;
                    lattice.set(i, j, k, self.index.position(node));
                }
            }
        }

        lattice.fill_interior(self.options.parallel);
        for k in 1..n3 {
            for j in 1..n2 {
                for i in 1..n1 {
                    let id = self
                        .index
                        .get_or_insert(NodeKey::Volume(v, i, j, k), lattice.get(i, j, k));
                    nodes[lattice.index(i, j, k)] = Some(id);
                }
            }
        }

        let nodes: Vec<NodeId> = nodes.into_iter().flatten().collect();
        let at = |i: usize, j: usize, k: usize| nodes[lattice.index(i, j, k)];
        for k in 0..n3 {
            for j in 0..n2 {
                for i in 0..n1 {
                    let hex = vec![
                        at(i, j, k),
                        at(i + 1, j, k),
                        at(i + 1, j + 1, k),
                        at(i, j + 1, k),
                        at(i, j, k + 1),
                        at(i + 1, j, k + 1),
                        at(i + 1, j + 1, k + 1),
                        at(i, j + 1, k + 1),
                    ];
                    self.elements
                        .push(Element::new(ElementKind::Hexahedron, hex, v.into()));
                }
            }
        }
        log::debug!("Meshed {:?}: {}x{}x{} hexahedra", v, n1, n2, n3);
        Ok(())
    }
}
