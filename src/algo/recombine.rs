//! Triangle-to-quad recombination.
//!
//! Adjacent triangle pairs are merged greedily, best quad first. A pair is
//! merged only if the resulting quad is convex and its quality reaches
//! [`RecombineOptions::min_quality`]. Triangles left without a partner stay
//! in the output, so a recombined face may be mixed.
//!
//! # Example
//!
//! ```
//! use blockmesh::algo::recombine::{recombine_triangles, RecombineOptions};
//! use nalgebra::{Point3, Vector3};
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let triangles = vec![[0, 1, 2], [0, 2, 3]];
//! let out = recombine_triangles(&points, &triangles, &Vector3::z(), &RecombineOptions::default());
//! assert_eq!(out.quads.len(), 1);
//! assert!(out.triangles.is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::quality::quad_quality;

/// Options for recombination.
#[derive(Debug, Clone)]
pub struct RecombineOptions {
    /// Lowest quad quality accepted for a merge, in `[0, 1]` (default: 0.01).
    pub min_quality: f64,
}

impl Default for RecombineOptions {
    fn default() -> Self {
        Self { min_quality: 0.01 }
    }
}

impl RecombineOptions {
    /// Set the lowest accepted quad quality.
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality.clamp(0.0, 1.0);
        self
    }
}

/// Result of recombining a triangulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recombined {
    /// Merged quads, counter-clockwise about the face normal.
    pub quads: Vec<[usize; 4]>,
    /// Triangles that found no partner.
    pub triangles: Vec<[usize; 3]>,
}

/// A merge candidate: two triangles sharing an edge.
struct Candidate {
    first: usize,
    second: usize,
    quad: [usize; 4],
    quality: f64,
}

/// Merge adjacent triangles into quads.
///
/// `triangles` index into `points` and must be counter-clockwise about
/// `normal`. Outputs keep the relative order of the input triangles: a quad
/// appears where its first triangle was.
pub fn recombine_triangles(
    points: &[Point3<f64>],
    triangles: &[[usize; 3]],
    normal: &Vector3<f64>,
    options: &RecombineOptions,
) -> Recombined {
    let normal = normal.normalize();

    let mut directed: HashMap<(usize, usize), usize> = HashMap::with_capacity(triangles.len() * 3);
    for (t, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            directed.insert((tri[k], tri[(k + 1) % 3]), t);
        }
    }

    let mut candidates = Vec::new();
    for (t1, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            let c = tri[(k + 2) % 3];
            let Some(&t2) = directed.get(&(b, a)) else {
                continue;
            };
            if t2 <= t1 {
                continue;
            }
            let other = &triangles[t2];
            let Some(&d) = other.iter().find(|&&v| v != a && v != b) else {
                continue;
            };
            let quad = [a, d, b, c];
            let corners = quad.map(|v| points[v]);
            let quality = quad_quality(&corners, &normal);
            if quality > 0.0 && quality >= options.min_quality {
                candidates.push(Candidate {
                    first: t1,
                    second: t2,
                    quad,
                    quality,
                });
            }
        }
    }

    candidates.sort_by(|x, y| {
        y.quality
            .partial_cmp(&x.quality)
            .unwrap_or(Ordering::Equal)
            .then((x.first, x.second).cmp(&(y.first, y.second)))
    });

    let mut matched = vec![false; triangles.len()];
    let mut quad_at: HashMap<usize, [usize; 4]> = HashMap::new();
    for cand in &candidates {
        if matched[cand.first] || matched[cand.second] {
            continue;
        }
        matched[cand.first] = true;
        matched[cand.second] = true;
        quad_at.insert(cand.first, cand.quad);
    }

    let mut out = Recombined::default();
    for (t, tri) in triangles.iter().enumerate() {
        if let Some(quad) = quad_at.get(&t) {
            out.quads.push(*quad);
        } else if !matched[t] {
            out.triangles.push(*tri);
        }
    }

    log::debug!(
        "Recombined {} triangles into {} quads, {} left over",
        triangles.len(),
        out.quads.len(),
        out.triangles.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::quality::quad_signed_area;

    fn grid(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut points = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                points.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let id = |i: usize, j: usize| j * (n + 1) + i;
        let mut tris = Vec::new();
        for j in 0..n {
            for i in 0..n {
                tris.push([id(i, j), id(i + 1, j), id(i + 1, j + 1)]);
                tris.push([id(i, j), id(i + 1, j + 1), id(i, j + 1)]);
            }
        }
        (points, tris)
    }

    #[test]
    fn test_split_grid_recombines_fully() {
        let (points, tris) = grid(3);
        let out = recombine_triangles(&points, &tris, &Vector3::z(), &RecombineOptions::default());
        assert_eq!(out.quads.len(), 9);
        assert!(out.triangles.is_empty());
        for q in &out.quads {
            let corners = q.map(|v| points[v]);
            assert!((quad_signed_area(&corners, &Vector3::z()) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_odd_triangle_left_over() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let tris = vec![[0, 1, 2], [0, 2, 3], [1, 4, 2]];
        let out = recombine_triangles(&points, &tris, &Vector3::z(), &RecombineOptions::default());
        assert_eq!(out.quads.len() * 2 + out.triangles.len(), 3);
        assert_eq!(out.triangles.len(), 1);
    }

    #[test]
    fn test_non_convex_pair_rejected() {
        // Dart-shaped pair: merging would give a reflex corner at vertex 2
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let tris = vec![[0, 1, 2], [0, 2, 3]];
        let out = recombine_triangles(&points, &tris, &Vector3::z(), &RecombineOptions::default());
        assert!(out.quads.is_empty());
        assert_eq!(out.triangles, tris);
    }

    #[test]
    fn test_min_quality_threshold() {
        let (points, tris) = grid(1);
        let strict = RecombineOptions::default().with_min_quality(0.99);
        let out = recombine_triangles(&points, &tris, &Vector3::z(), &strict);
        assert_eq!(out.quads.len(), 1);

        let s = 3.0_f64.sqrt() / 2.0;
        let rhombus = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.5, s, 0.0),
            Point3::new(0.5, s, 0.0),
        ];
        let tris = vec![[0, 1, 2], [0, 2, 3]];
        let strict = RecombineOptions::default().with_min_quality(0.9);
        let out = recombine_triangles(&rhombus, &tris, &Vector3::z(), &strict);
        assert!(out.quads.is_empty());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let tris = vec![[0, 1, 2], [0, 2, 3], [1, 4, 2]];
        let opts = RecombineOptions::default();
        let first = recombine_triangles(&points, &tris, &Vector3::z(), &opts);
        let again = recombine_triangles(&points, &first.triangles, &Vector3::z(), &opts);
        assert!(again.quads.is_empty());
        assert_eq!(again.triangles, first.triangles);
    }
}
