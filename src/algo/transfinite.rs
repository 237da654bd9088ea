//! Transfinite interpolation over structured lattices.
//!
//! A lattice holds one position per structured node. Callers fill the
//! boundary (the nodes already owned by edges and faces) and the interior
//! is then blended from the boundary alone:
//!
//! - [`Lattice2`]: Coons patch over four sides
//! - [`Lattice3`]: face terms minus edge terms plus corner terms over six
//!   sides
//!
//! Interpolation never changes boundary positions, so nodes shared with a
//! neighbouring block keep their coordinates.
//!
//! # Example
//!
//! ```
//! use blockmesh::algo::transfinite::Lattice2;
//! use nalgebra::Point3;
//!
//! let mut lattice = Lattice2::new([2, 2]);
//! for j in 0..=2 {
//!     for i in 0..=2 {
//!         if lattice.is_boundary(i, j) {
//!             lattice.set(i, j, Point3::new(i as f64, j as f64, 0.0));
//!         }
//!     }
//! }
//! lattice.fill_interior(false);
//! assert_eq!(lattice.get(1, 1), Point3::new(1.0, 1.0, 0.0));
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

/// Point `k` of `n` equal segments from `a` to `b`.
#[inline]
pub fn segment_point(a: &Point3<f64>, b: &Point3<f64>, k: usize, n: usize) -> Point3<f64> {
    a + (b - a) * (k as f64 / n as f64)
}

/// Node positions of an `n1 x n2` quad lattice, stored row by row.
#[derive(Debug, Clone)]
pub struct Lattice2 {
    dims: [usize; 2],
    points: Vec<Point3<f64>>,
}

impl Lattice2 {
    /// Create a lattice with `dims` segments along each direction. All
    /// positions start at the origin.
    pub fn new(dims: [usize; 2]) -> Self {
        Self {
            dims,
            points: vec![Point3::origin(); (dims[0] + 1) * (dims[1] + 1)],
        }
    }

    /// Segments along each direction.
    pub fn dims(&self) -> [usize; 2] {
        self.dims
    }

    /// Flat index of node `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * (self.dims[0] + 1) + i
    }

    /// Whether `(i, j)` lies on a side.
    #[inline]
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.dims[0] || j == self.dims[1]
    }

    /// Position of node `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Point3<f64> {
        self.points[self.index(i, j)]
    }

    /// Set the position of node `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, p: Point3<f64>) {
        let idx = self.index(i, j);
        self.points[idx] = p;
    }

    /// All positions, row by row.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Interpolated position of interior node `(i, j)` from the boundary.
    pub fn blend(&self, i: usize, j: usize) -> Point3<f64> {
        let [n1, n2] = self.dims;
        let u = i as f64 / n1 as f64;
        let v = j as f64 / n2 as f64;
        let p = |i: usize, j: usize| self.get(i, j).coords;

        let sides = p(i, 0) * (1.0 - v) + p(i, n2) * v + p(0, j) * (1.0 - u) + p(n1, j) * u;
        let corners = p(0, 0) * ((1.0 - u) * (1.0 - v))
            + p(n1, 0) * (u * (1.0 - v))
            + p(n1, n2) * (u * v)
            + p(0, n2) * ((1.0 - u) * v);
        Point3::from(sides - corners)
    }

    /// Replace every interior position by its transfinite blend.
    pub fn fill_interior(&mut self, parallel: bool) {
        let [n1, n2] = self.dims;
        if n1 < 2 || n2 < 2 {
            return;
        }
        let row = |j: usize| -> Vec<Point3<f64>> { (1..n1).map(|i| self.blend(i, j)).collect() };
        let rows: Vec<Vec<Point3<f64>>> = if parallel {
            (1..n2).into_par_iter().map(row).collect()
        } else {
            (1..n2).map(row).collect()
        };
        for (j, row) in (1..n2).zip(rows) {
            for (i, p) in (1..n1).zip(row) {
                self.set(i, j, p);
            }
        }
    }
}

/// Node positions of an `n1 x n2 x n3` hex lattice, stored layer by layer.
#[derive(Debug, Clone)]
pub struct Lattice3 {
    dims: [usize; 3],
    points: Vec<Point3<f64>>,
}

impl Lattice3 {
    /// Create a lattice with `dims` segments along each direction.
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            points: vec![Point3::origin(); (dims[0] + 1) * (dims[1] + 1) * (dims[2] + 1)],
        }
    }

    /// Segments along each direction.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Flat index of node `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * (self.dims[1] + 1) + j) * (self.dims[0] + 1) + i
    }

    /// Whether `(i, j, k)` lies on a side.
    #[inline]
    pub fn is_boundary(&self, i: usize, j: usize, k: usize) -> bool {
        let [n1, n2, n3] = self.dims;
        i == 0 || j == 0 || k == 0 || i == n1 || j == n2 || k == n3
    }

    /// Position of node `(i, j, k)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        self.points[self.index(i, j, k)]
    }

    /// Set the position of node `(i, j, k)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, p: Point3<f64>) {
        let idx = self.index(i, j, k);
        self.points[idx] = p;
    }

    /// All positions, layer by layer.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Interpolated position of interior node `(i, j, k)` from the six sides.
    pub fn blend(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        let [n1, n2, n3] = self.dims;
        let u = i as f64 / n1 as f64;
        let v = j as f64 / n2 as f64;
        let w = k as f64 / n3 as f64;
        let (su, sv, sw) = (1.0 - u, 1.0 - v, 1.0 - w);
        let p = |i: usize, j: usize, k: usize| -> Vector3<f64> { self.get(i, j, k).coords };

        let faces = p(0, j, k) * su
            + p(n1, j, k) * u
            + p(i, 0, k) * sv
            + p(i, n2, k) * v
            + p(i, j, 0) * sw
            + p(i, j, n3) * w;

        let edges = p(0, 0, k) * (su * sv)
            + p(n1, 0, k) * (u * sv)
            + p(0, n2, k) * (su * v)
            + p(n1, n2, k) * (u * v)
            + p(0, j, 0) * (su * sw)
            + p(n1, j, 0) * (u * sw)
            + p(0, j, n3) * (su * w)
            + p(n1, j, n3) * (u * w)
            + p(i, 0, 0) * (sv * sw)
            + p(i, n2, 0) * (v * sw)
            + p(i, 0, n3) * (sv * w)
            + p(i, n2, n3) * (v * w);

        let corners = p(0, 0, 0) * (su * sv * sw)
            + p(n1, 0, 0) * (u * sv * sw)
            + p(0, n2, 0) * (su * v * sw)
            + p(n1, n2, 0) * (u * v * sw)
            + p(0, 0, n3) * (su * sv * w)
            + p(n1, 0, n3) * (u * sv * w)
            + p(0, n2, n3) * (su * v * w)
            + p(n1, n2, n3) * (u * v * w);

        Point3::from(faces - edges + corners)
    }

    /// Replace every interior position by its transfinite blend.
    pub fn fill_interior(&mut self, parallel: bool) {
        let [n1, n2, n3] = self.dims;
        if n1 < 2 || n2 < 2 || n3 < 2 {
            return;
        }
        let layer = |k: usize| -> Vec<Point3<f64>> {
            let mut out = Vec::with_capacity((n1 - 1) * (n2 - 1));
            for j in 1..n2 {
                for i in 1..n1 {
                    out.push(self.blend(i, j, k));
                }
            }
            out
        };
        let layers: Vec<Vec<Point3<f64>>> = if parallel {
            (1..n3).into_par_iter().map(layer).collect()
        } else {
            (1..n3).map(layer).collect()
        };
        for (k, layer) in (1..n3).zip(layers) {
            let mut it = layer.into_iter();
            for j in 1..n2 {
                for i in 1..n1 {
                    if let Some(p) = it.next() {
                        self.set(i, j, k, p);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_point() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        assert_relative_eq!(segment_point(&a, &b, 3, 4), Point3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_trapezoid_patch() {
        // Bottom 0..4, top 1..3: interior rows shrink linearly
        let mut lattice = Lattice2::new([4, 2]);
        let bl = Point3::new(0.0, 0.0, 0.0);
        let br = Point3::new(4.0, 0.0, 0.0);
        let tl = Point3::new(1.0, 2.0, 0.0);
        let tr = Point3::new(3.0, 2.0, 0.0);
        for i in 0..=4 {
            lattice.set(i, 0, segment_point(&bl, &br, i, 4));
            lattice.set(i, 2, segment_point(&tl, &tr, i, 4));
        }
        for j in 0..=2 {
            lattice.set(0, j, segment_point(&bl, &tl, j, 2));
            lattice.set(4, j, segment_point(&br, &tr, j, 2));
        }
        lattice.fill_interior(false);
        assert_relative_eq!(lattice.get(2, 1), Point3::new(2.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(lattice.get(1, 1), Point3::new(1.25, 1.0, 0.0), epsilon = 1e-12);
    }

    fn box_lattice(dims: [usize; 3], size: [f64; 3]) -> Lattice3 {
        let mut lattice = Lattice3::new(dims);
        for k in 0..=dims[2] {
            for j in 0..=dims[1] {
                for i in 0..=dims[0] {
                    if lattice.is_boundary(i, j, k) {
                        let p = Point3::new(
                            size[0] * i as f64 / dims[0] as f64,
                            size[1] * j as f64 / dims[1] as f64,
                            size[2] * k as f64 / dims[2] as f64,
                        );
                        lattice.set(i, j, k, p);
                    }
                }
            }
        }
        lattice
    }

    #[test]
    fn test_box_interior_is_regular() {
        let mut lattice = box_lattice([4, 3, 5], [1.0, 0.3, 0.5]);
        lattice.fill_interior(false);
        assert_relative_eq!(lattice.get(2, 1, 3), Point3::new(0.5, 0.1, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = box_lattice([6, 4, 3], [2.0, 1.0, 1.0]);
        let mut b = a.clone();
        a.fill_interior(true);
        b.fill_interior(false);
        assert_eq!(a.points(), b.points());
    }
}
