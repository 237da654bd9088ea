//! Benchmarks for mesh generation.

use criterion::{criterion_group, criterion_main, Criterion};
use blockmesh::algo::recombine::{recombine_triangles, RecombineOptions};
use blockmesh::algo::triangulate::{DelaunayTriangulator, Triangulator};
use blockmesh::prelude::*;
use nalgebra::{Point2, Point3, Vector3};

fn hex_block(geometry: &Geometry, cube: &primitives::Cuboid, counts: [usize; 3]) -> MeshConstraints<'_> {
    let mut c = MeshConstraints::new(geometry);
    for (edges, n) in [
        (cube.x_edges(), counts[0]),
        (cube.y_edges(), counts[1]),
        (cube.z_edges(), counts[2]),
    ] {
        for e in edges {
            c.set_edge_subdivision(e, n).unwrap();
        }
    }
    for f in cube.faces {
        c.mark_face_transfinite(f, None).unwrap();
    }
    c.mark_volume_transfinite(cube.volume).unwrap();
    c
}

fn bench_structured(c: &mut Criterion) {
    let mut b = GeometryBuilder::new();
    let rect = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
    let geometry = b.synchronize();
    let mut constraints = MeshConstraints::new(&geometry);
    for (e, n) in rect.edges.iter().zip([200, 100, 200, 100]) {
        constraints.set_edge_subdivision(*e, n).unwrap();
    }
    constraints.mark_face_transfinite(rect.face, None).unwrap();

    c.bench_function("rectangle_200x100", |b| {
        b.iter(|| MeshGenerator::new(&constraints).generate().unwrap())
    });

    let mut b = GeometryBuilder::new();
    let cube = primitives::cuboid(&mut b, 1.0, 0.1, 0.04, None).unwrap();
    let geometry = b.synchronize();
    let constraints = hex_block(&geometry, &cube, [60, 10, 5]);

    c.bench_function("hexahedron_60x10x5", |b| {
        b.iter(|| MeshGenerator::new(&constraints).generate().unwrap())
    });

    let mut b = GeometryBuilder::new();
    let cube = primitives::cuboid(&mut b, 1.0, 1.0, 1.0, None).unwrap();
    let geometry = b.synchronize();
    let constraints = hex_block(&geometry, &cube, [40, 40, 40]);

    c.bench_function("hexahedron_40_parallel", |b| {
        b.iter(|| MeshGenerator::new(&constraints).generate().unwrap())
    });
    c.bench_function("hexahedron_40_sequential", |b| {
        b.iter(|| {
            MeshGenerator::new(&constraints)
                .with_options(MeshOptions::default().sequential())
                .generate()
                .unwrap()
        })
    });
}

fn bench_free_face(c: &mut Criterion) {
    let n = 20;
    let h = 1.0 / n as f64;
    let mut boundary = Vec::with_capacity(4 * n);
    for k in 0..n {
        boundary.push(Point2::new(k as f64 * h, 0.0));
    }
    for k in 0..n {
        boundary.push(Point2::new(1.0, k as f64 * h));
    }
    for k in 0..n {
        boundary.push(Point2::new(1.0 - k as f64 * h, 1.0));
    }
    for k in 0..n {
        boundary.push(Point2::new(0.0, 1.0 - k as f64 * h));
    }
    let triangulator = DelaunayTriangulator::new();

    c.bench_function("triangulate_square_20", |b| {
        b.iter(|| triangulator.triangulate(&boundary, h).unwrap())
    });

    let triangulation = triangulator.triangulate(&boundary, h).unwrap();
    let points: Vec<Point3<f64>> = boundary
        .iter()
        .chain(&triangulation.interior)
        .map(|p| Point3::new(p.x, p.y, 0.0))
        .collect();
    let options = RecombineOptions::default();

    c.bench_function("recombine_square_20", |b| {
        b.iter(|| recombine_triangles(&points, &triangulation.triangles, &Vector3::z(), &options))
    });
}

criterion_group!(benches, bench_structured, bench_free_face);
criterion_main!(benches);
