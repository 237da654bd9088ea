//! Element shape measures: orientation and distortion.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};

/// Area-weighted normal of a polygon (Newell's method).
///
/// The direction follows the right-hand rule over the vertex order; the
/// length is twice the polygon area.
pub fn polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Signed area of a triangle seen from `normal`.
pub fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
    0.5 * (b - a).cross(&(c - a)).dot(normal)
}

/// Signed area of a quadrilateral seen from the unit `normal`.
///
/// Positive when the vertices run counter-clockwise around `normal`.
pub fn quad_signed_area(quad: &[Point3<f64>; 4], normal: &Vector3<f64>) -> f64 {
    0.5 * polygon_normal(quad).dot(normal)
}

/// Quality of a quadrilateral in `[0, 1]`: 1 for a rectangle, 0 for a
/// degenerate or non-convex quad.
///
/// The measure is the worst corner's closeness to a right angle,
/// `1 - |angle - 90°| / 90°`, evaluated around the unit `normal`.
pub fn quad_quality(quad: &[Point3<f64>; 4], normal: &Vector3<f64>) -> f64 {
    let mut worst = 1.0_f64;
    for i in 0..4 {
        let prev = &quad[(i + 3) % 4];
        let here = &quad[i];
        let next = &quad[(i + 1) % 4];
        let u = next - here;
        let v = prev - here;
        let (lu, lv) = (u.norm(), v.norm());
        if lu == 0.0 || lv == 0.0 {
            return 0.0;
        }
        // Convex corner when (next - here) x (prev - here) points along the normal
        if u.cross(&v).dot(normal) <= 0.0 {
            return 0.0;
        }
        let angle = (u.dot(&v) / (lu * lv)).clamp(-1.0, 1.0).acos();
        worst = worst.min(1.0 - (angle - FRAC_PI_2).abs() / FRAC_PI_2);
    }
    worst.max(0.0)
}

/// Jacobian determinants at the eight corners of a hexahedron in Gmsh order
/// (bottom quad `0-1-2-3`, top quad `4-5-6-7`).
pub fn hex_corner_jacobians(hex: &[Point3<f64>; 8]) -> [f64; 8] {
    // For each corner: its neighbours along the local x, y and z directions
    const FRAMES: [[usize; 4]; 8] = [
        [0, 1, 3, 4],
        [1, 2, 0, 5],
        [2, 3, 1, 6],
        [3, 0, 2, 7],
        [4, 7, 5, 0],
        [5, 4, 6, 1],
        [6, 5, 7, 2],
        [7, 6, 4, 3],
    ];
    let mut out = [0.0; 8];
    for (slot, [c, a, b, d]) in out.iter_mut().zip(FRAMES) {
        let ea = hex[a] - hex[c];
        let eb = hex[b] - hex[c];
        let ed = hex[d] - hex[c];
        *slot = ea.cross(&eb).dot(&ed);
    }
    out
}

/// Smallest corner Jacobian of a hexahedron. Positive for a valid element.
pub fn hex_min_jacobian(hex: &[Point3<f64>; 8]) -> f64 {
    hex_corner_jacobians(hex)
        .into_iter()
        .fold(f64::INFINITY, f64::min)
}

/// Signed volume of a hexahedron in Gmsh order, from six tetrahedra around
/// the `0-6` diagonal.
pub fn hex_signed_volume(hex: &[Point3<f64>; 8]) -> f64 {
    const TETS: [[usize; 3]; 6] = [[1, 2, 6], [2, 3, 6], [3, 7, 6], [7, 4, 6], [4, 5, 6], [5, 1, 6]];
    let a = hex[0];
    TETS.iter()
        .map(|&[b, c, d]| (hex[b] - a).cross(&(hex[c] - a)).dot(&(hex[d] - a)))
        .sum::<f64>()
        / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_square_quality() {
        let z = Vector3::z();
        assert_relative_eq!(quad_quality(&unit_square(), &z), 1.0, epsilon = 1e-12);
        assert_relative_eq!(quad_signed_area(&unit_square(), &z), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_quad_is_invalid() {
        let mut q = unit_square();
        q.reverse();
        let z = Vector3::z();
        assert_eq!(quad_quality(&q, &z), 0.0);
        assert!(quad_signed_area(&q, &z) < 0.0);
    }

    #[test]
    fn test_non_convex_quad() {
        let q = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        assert_eq!(quad_quality(&q, &Vector3::z()), 0.0);
    }

    #[test]
    fn test_rhombus_quality() {
        // 60/120 degree rhombus: worst corner is 30 degrees off square
        let s = 3.0_f64.sqrt() / 2.0;
        let q = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.5, s, 0.0),
            Point3::new(0.5, s, 0.0),
        ];
        assert_relative_eq!(quad_quality(&q, &Vector3::z()), 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_cube_jacobians() {
        let hex = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        for j in hex_corner_jacobians(&hex) {
            assert_relative_eq!(j, 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(hex_signed_volume(&hex), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverted_hex() {
        let mut hex = [Point3::origin(); 8];
        let base = unit_square();
        for i in 0..4 {
            hex[i] = base[i] + Vector3::z();
            hex[i + 4] = base[i];
        }
        assert!(hex_min_jacobian(&hex) < 0.0);
        assert!(hex_signed_volume(&hex) < 0.0);
    }
}
