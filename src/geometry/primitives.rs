//! Ready-made block geometries.
//!
//! These build the entities of common blocks into an existing
//! [`GeometryBuilder`] and return their ids so callers can attach
//! directives and physical groups.

use nalgebra::Point3;

use super::index::{EdgeId, FaceId, PointId, VolumeId};
use super::model::GeometryBuilder;
use crate::error::Result;

/// Ids of an axis-aligned rectangle in the `z = 0` plane.
#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
    /// Corners, counter-clockwise from the origin.
    pub corners: [PointId; 4],
    /// Bottom, right, top, left.
    pub edges: [EdgeId; 4],
    /// The rectangle face; its loop is counter-clockwise seen from `+z`.
    pub face: FaceId,
}

/// Build a `length x height` rectangle with its lower-left corner at the origin.
pub fn rectangle(
    b: &mut GeometryBuilder,
    length: f64,
    height: f64,
    size: Option<f64>,
) -> Result<Rectangle> {
    let p1 = b.add_point(Point3::new(0.0, 0.0, 0.0), size)?;
    let p2 = b.add_point(Point3::new(length, 0.0, 0.0), size)?;
    let p3 = b.add_point(Point3::new(length, height, 0.0), size)?;
    let p4 = b.add_point(Point3::new(0.0, height, 0.0), size)?;

    let l1 = b.add_edge(p1, p2)?;
    let l2 = b.add_edge(p2, p3)?;
    let l3 = b.add_edge(p3, p4)?;
    let l4 = b.add_edge(p4, p1)?;

    let cl = b.add_curve_loop(&[l1.into(), l2.into(), l3.into(), l4.into()])?;
    let face = b.add_face(cl, &[])?;

    Ok(Rectangle {
        corners: [p1, p2, p3, p4],
        edges: [l1, l2, l3, l4],
        face,
    })
}

/// Ids of an axis-aligned box.
#[derive(Debug, Clone, Copy)]
pub struct Cuboid {
    /// Bottom corners counter-clockwise, then the top corners above them.
    pub corners: [PointId; 8],
    /// Bottom x/y edges (4), top x/y edges (4), vertical edges (4).
    pub edges: [EdgeId; 12],
    /// Bottom (`z=0`), top, front (`y=0`), side `x=length`, back (`y=width`),
    /// side `x=0`.
    pub faces: [FaceId; 6],
    /// The enclosed volume.
    pub volume: VolumeId,
}

impl Cuboid {
    /// Edges running along x.
    pub fn x_edges(&self) -> [EdgeId; 4] {
        [self.edges[0], self.edges[2], self.edges[4], self.edges[6]]
    }

    /// Edges running along y.
    pub fn y_edges(&self) -> [EdgeId; 4] {
        [self.edges[1], self.edges[3], self.edges[5], self.edges[7]]
    }

    /// Edges running along z.
    pub fn z_edges(&self) -> [EdgeId; 4] {
        [self.edges[8], self.edges[9], self.edges[10], self.edges[11]]
    }
}

/// Build a `length x width x height` box with one corner at the origin.
pub fn cuboid(
    b: &mut GeometryBuilder,
    length: f64,
    width: f64,
    height: f64,
    size: Option<f64>,
) -> Result<Cuboid> {
    let p1 = b.add_point(Point3::new(0.0, 0.0, 0.0), size)?;
    let p2 = b.add_point(Point3::new(length, 0.0, 0.0), size)?;
    let p3 = b.add_point(Point3::new(length, width, 0.0), size)?;
    let p4 = b.add_point(Point3::new(0.0, width, 0.0), size)?;
    let p5 = b.add_point(Point3::new(0.0, 0.0, height), size)?;
    let p6 = b.add_point(Point3::new(length, 0.0, height), size)?;
    let p7 = b.add_point(Point3::new(length, width, height), size)?;
    let p8 = b.add_point(Point3::new(0.0, width, height), size)?;

    let lx1 = b.add_edge(p1, p2)?;
    let ly2 = b.add_edge(p2, p3)?;
    let lx3 = b.add_edge(p3, p4)?;
    let ly4 = b.add_edge(p4, p1)?;
    let lx5 = b.add_edge(p5, p6)?;
    let ly6 = b.add_edge(p6, p7)?;
    let lx7 = b.add_edge(p7, p8)?;
    let ly8 = b.add_edge(p8, p5)?;
    let lz9 = b.add_edge(p1, p5)?;
    let lz10 = b.add_edge(p2, p6)?;
    let lz11 = b.add_edge(p3, p7)?;
    let lz12 = b.add_edge(p4, p8)?;

    let loops = [
        b.add_curve_loop(&[lx1.into(), ly2.into(), lx3.into(), ly4.into()])?,
        b.add_curve_loop(&[lx5.into(), ly6.into(), lx7.into(), ly8.into()])?,
        b.add_curve_loop(&[lx1.into(), lz10.into(), -lx5, -lz9])?,
        b.add_curve_loop(&[ly2.into(), lz11.into(), -ly6, -lz10])?,
        b.add_curve_loop(&[lx3.into(), lz12.into(), -lx7, -lz11])?,
        b.add_curve_loop(&[ly4.into(), lz9.into(), -ly8, -lz12])?,
    ];
    let mut faces = [FaceId::new(0); 6];
    for (slot, cl) in faces.iter_mut().zip(loops) {
        *slot = b.add_face(cl, &[])?;
    }

    let shell = b.add_surface_loop(&faces)?;
    let volume = b.add_volume(shell)?;

    Ok(Cuboid {
        corners: [p1, p2, p3, p4, p5, p6, p7, p8],
        edges: [lx1, ly2, lx3, ly4, lx5, ly6, lx7, ly8, lz9, lz10, lz11, lz12],
        faces,
        volume,
    })
}

/// Ids of a square split vertically into two halves.
#[derive(Debug, Clone, Copy)]
pub struct SplitSquare {
    /// Bottom-left, bottom-right, top-right, top-left, bottom-middle,
    /// top-middle.
    pub points: [PointId; 6],
    /// Bottom-left half, bottom-right half, right side, top-right half,
    /// top-left half, left side, middle divider (bottom to top).
    pub edges: [EdgeId; 7],
    /// Left half; loop counter-clockwise.
    pub left: FaceId,
    /// Right half; loop counter-clockwise, uses the divider backwards.
    pub right: FaceId,
}

/// Build a `side x side` square divided at `x = side / 2`.
pub fn split_square(b: &mut GeometryBuilder, side: f64, size: Option<f64>) -> Result<SplitSquare> {
    let half = 0.5 * side;
    let p1 = b.add_point(Point3::new(0.0, 0.0, 0.0), size)?;
    let p2 = b.add_point(Point3::new(side, 0.0, 0.0), size)?;
    let p3 = b.add_point(Point3::new(side, side, 0.0), size)?;
    let p4 = b.add_point(Point3::new(0.0, side, 0.0), size)?;
    let p5 = b.add_point(Point3::new(half, 0.0, 0.0), size)?;
    let p6 = b.add_point(Point3::new(half, side, 0.0), size)?;

    let l1 = b.add_edge(p1, p5)?;
    let l2 = b.add_edge(p5, p2)?;
    let l3 = b.add_edge(p2, p3)?;
    let l4 = b.add_edge(p3, p6)?;
    let l5 = b.add_edge(p6, p4)?;
    let l6 = b.add_edge(p4, p1)?;
    let l7 = b.add_edge(p5, p6)?;

    let left_loop = b.add_curve_loop(&[l1.into(), l7.into(), l5.into(), l6.into()])?;
    let right_loop = b.add_curve_loop(&[l2.into(), l3.into(), l4.into(), -l7])?;
    let left = b.add_face(left_loop, &[])?;
    let right = b.add_face(right_loop, &[])?;

    Ok(SplitSquare {
        points: [p1, p2, p3, p4, p5, p6],
        edges: [l1, l2, l3, l4, l5, l6, l7],
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_is_watertight() {
        let mut b = GeometryBuilder::new();
        let c = cuboid(&mut b, 1.0, 0.1, 0.04, None).unwrap();
        let g = b.synchronize();
        assert_eq!(g.volume_faces(c.volume).len(), 6);
        assert_eq!(g.volume_edges(c.volume).len(), 12);
        assert_eq!(g.volume_points(c.volume).len(), 8);
        for e in c.edges {
            assert_eq!(g.edge_faces(e).len(), 2);
        }
    }

    #[test]
    fn test_split_square_shares_divider() {
        let mut b = GeometryBuilder::new();
        let s = split_square(&mut b, 1.0, Some(0.1)).unwrap();
        let g = b.synchronize();
        assert_eq!(g.edge_faces(s.edges[6]), &[s.left, s.right]);
        assert_eq!(g.point(s.points[4]).size, Some(0.1));
    }
}
