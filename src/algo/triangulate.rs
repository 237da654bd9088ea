//! Unstructured triangulation of free faces.
//!
//! Faces that are not transfinite are handed to a [`Triangulator`]. The
//! generator fixes the boundary nodes first (they are shared with the
//! neighbouring edges), projects them into the face plane and asks the
//! triangulator for interior points and triangles. Any implementation can be
//! plugged in through [`crate::mesh::MeshGenerator::with_triangulator`].
//!
//! [`DelaunayTriangulator`] is the built-in implementation. It handles
//! convex planar faces: interior points are laid out on a regular grid of
//! the target size (see [`PointLayout`]) and connected with Bowyer-Watson
//! insertion.

use std::collections::HashSet;

use nalgebra::{Point2, Point3, Vector3};
use robust::{incircle, orient2d, Coord};

use super::quality::polygon_normal;
use crate::error::{MeshError, Result};

/// Triangles over a boundary polygon plus the interior points they use.
///
/// Triangle indices `0..boundary.len()` refer to the boundary points in the
/// order they were given; indices from `boundary.len()` on refer to
/// `interior`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Points added inside the polygon.
    pub interior: Vec<Point2<f64>>,
    /// Counter-clockwise triangles.
    pub triangles: Vec<[usize; 3]>,
}

/// Fills a counter-clockwise boundary polygon with triangles of roughly the
/// given size. Boundary points must be kept as they are.
pub trait Triangulator: Send + Sync + std::fmt::Debug {
    /// Triangulate the polygon.
    fn triangulate(&self, boundary: &[Point2<f64>], size: f64) -> Result<Triangulation>;
}

/// Orthonormal frame of a planar face.
#[derive(Debug, Clone, Copy)]
pub struct PlaneFrame {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    normal: Vector3<f64>,
}

impl PlaneFrame {
    /// Frame whose normal follows the polygon's orientation, so the polygon
    /// projects counter-clockwise.
    pub fn from_polygon(points: &[Point3<f64>]) -> Result<Self> {
        let normal = polygon_normal(points);
        let len = normal.norm();
        if points.len() < 3 || len <= f64::EPSILON {
            return Err(MeshError::Unsupported(
                "cannot triangulate a degenerate face".to_string(),
            ));
        }
        let normal = normal / len;
        let origin = points[0];
        // First in-plane direction: the first boundary segment of usable length
        let u = (0..points.len())
            .map(|k| {
                let d = points[(k + 1) % points.len()] - points[k];
                d - normal * d.dot(&normal)
            })
            .find(|d| d.norm() > 1e-12 * len.sqrt())
            .map(|d| d.normalize())
            .ok_or_else(|| MeshError::Unsupported("degenerate face boundary".to_string()))?;
        let v = normal.cross(&u);
        Ok(Self {
            origin,
            u,
            v,
            normal,
        })
    }

    /// Unit normal of the plane.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Distance of `p` from the plane.
    pub fn offset(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal)
    }

    /// In-plane coordinates of `p`.
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let d = p - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Point of the plane at in-plane coordinates `q`.
    pub fn lift(&self, q: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u * q.x + self.v * q.y
    }
}

/// Arrangement of the interior points of a free face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointLayout {
    /// Square grid of the target size, aligned with the first boundary
    /// segment. Triangles come in right-angled pairs that recombine into
    /// squares.
    #[default]
    Square,
    /// Rows offset by half a cell, giving near-equilateral triangles.
    Staggered,
}

/// Delaunay triangulation of convex faces over a regular interior grid.
#[derive(Debug, Clone, Default)]
pub struct DelaunayTriangulator {
    layout: PointLayout,
}

impl DelaunayTriangulator {
    /// Create the triangulator with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interior point layout.
    pub fn with_layout(mut self, layout: PointLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, boundary: &[Point2<f64>], size: f64) -> Result<Triangulation> {
        if boundary.len() < 3 {
            return Err(MeshError::invalid_param(
                "boundary",
                boundary.len(),
                "a polygon needs at least 3 points",
            ));
        }
        if !(size.is_finite() && size > 0.0) {
            return Err(MeshError::invalid_param("size", size, "must be positive"));
        }
        check_convex(boundary)?;

        let interior = interior_points(boundary, size, self.layout);
        let mut points: Vec<Point2<f64>> = boundary.to_vec();
        points.extend_from_slice(&interior);

        let triangles = bowyer_watson(&points, size);
        Ok(Triangulation {
            interior,
            triangles,
        })
    }
}

fn coord(p: &Point2<f64>) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Reject polygons with a reflex corner. Collinear runs are allowed.
fn check_convex(boundary: &[Point2<f64>]) -> Result<()> {
    let n = boundary.len();
    let extent = bounding_extent(boundary);
    let tol = 1e-12 * extent * extent;
    let mut area = 0.0;
    for i in 0..n {
        let a = &boundary[(i + n - 1) % n];
        let b = &boundary[i];
        let c = &boundary[(i + 1) % n];
        let turn = (b - a).perp(&(c - b));
        if turn < -tol {
            return Err(MeshError::Unsupported(
                "the built-in triangulator only handles convex faces".to_string(),
            ));
        }
        area += a.x * b.y - b.x * a.y;
    }
    if area <= 0.0 {
        return Err(MeshError::Unsupported(
            "face boundary must be counter-clockwise in its plane".to_string(),
        ));
    }
    Ok(())
}

fn bounding_extent(points: &[Point2<f64>]) -> f64 {
    let (mut lo, mut hi) = (points[0], points[0]);
    for p in points {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    (hi - lo).norm()
}

fn distance_to_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Grid points at least half a cell away from the boundary.
fn interior_points(boundary: &[Point2<f64>], size: f64, layout: PointLayout) -> Vec<Point2<f64>> {
    let (mut lo, mut hi) = (boundary[0], boundary[0]);
    for p in boundary {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    let n = boundary.len();
    let row_step = match layout {
        PointLayout::Square => size,
        PointLayout::Staggered => size * 3.0_f64.sqrt() / 2.0,
    };

    let mut out = Vec::new();
    let mut row = 1usize;
    loop {
        let y = lo.y + row as f64 * row_step;
        if y >= hi.y {
            break;
        }
        let shift = match layout {
            PointLayout::Staggered if row % 2 == 1 => 0.5 * size,
            _ => 0.0,
        };
        let mut col = match layout {
            PointLayout::Square => 1usize,
            PointLayout::Staggered => 0,
        };
        loop {
            let x = lo.x + shift + col as f64 * size;
            if x >= hi.x {
                break;
            }
            let p = Point2::new(x, y);
            let inside = (0..n).all(|i| {
                let a = &boundary[i];
                let b = &boundary[(i + 1) % n];
                orient2d(coord(a), coord(b), coord(&p)) > 0.0
                    && distance_to_segment(&p, a, b) >= 0.5 * size
            });
            if inside {
                out.push(p);
            }
            col += 1;
        }
        row += 1;
    }
    out
}

/// Incremental Delaunay triangulation inside a large enclosing triangle.
///
/// Triangles touching the enclosing triangle's corners are discarded at the
/// end, which leaves the triangulation of the convex hull.
fn bowyer_watson(points: &[Point2<f64>], size: f64) -> Vec<[usize; 3]> {
    let n = points.len();
    let (mut lo, mut hi) = (points[0], points[0]);
    for p in points {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    let center = Point2::from((lo.coords + hi.coords) * 0.5);
    let reach = 100.0 * (hi - lo).norm().max(size);

    let mut all = points.to_vec();
    all.push(Point2::new(center.x - reach, center.y - reach));
    all.push(Point2::new(center.x + reach, center.y - reach));
    all.push(Point2::new(center.x, center.y + reach));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for p in 0..n {
        let pc = coord(&all[p]);
        let mut bad = Vec::new();
        triangles.retain(|t| {
            let inside =
                incircle(coord(&all[t[0]]), coord(&all[t[1]]), coord(&all[t[2]]), pc) > 0.0;
            if inside {
                bad.push(*t);
            }
            !inside
        });

        let edges: HashSet<(usize, usize)> = bad
            .iter()
            .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .collect();
        for &(a, b) in &edges {
            if !edges.contains(&(b, a)) {
                triangles.push([a, b, p]);
            }
        }
    }

    let min_area = 1e-12 * size * size;
    triangles.retain(|t| {
        t.iter().all(|&v| v < n)
            && 0.5 * orient2d(coord(&all[t[0]]), coord(&all[t[1]]), coord(&all[t[2]])) > min_area
    });
    // Deterministic output order
    triangles.sort_unstable();
    triangles
}
