//! Mesh a 1 x 0.1 x 0.04 box with structured hexahedra and save it as MSH.
//!
//! Run with: cargo run --example hex_block

use blockmesh::io::msh;
use blockmesh::prelude::*;

fn main() {
    let mut b = GeometryBuilder::new();
    let cube = primitives::cuboid(&mut b, 1.0, 0.1, 0.04, None).expect("Failed to build box");
    let geometry = b.synchronize();

    let mut constraints = MeshConstraints::new(&geometry);
    for (edges, n) in [(cube.x_edges(), 60), (cube.y_edges(), 10), (cube.z_edges(), 5)] {
        for edge in edges {
            constraints
                .set_edge_subdivision(edge, n)
                .expect("Invalid subdivision");
        }
    }
    for face in cube.faces {
        constraints
            .mark_face_transfinite(face, None)
            .expect("Face is not structurable");
    }
    constraints
        .mark_volume_transfinite(cube.volume)
        .expect("Volume is not structurable");

    // Named boundary faces plus the bulk
    let mut groups = PhysicalGroups::new(&geometry);
    let names = ["bottom", "top", "front", "left", "back", "right"];
    for ((tag, face), name) in (1..).zip(cube.faces).zip(names) {
        groups
            .add_named(2, &[face.into()], Some(tag), name)
            .expect("Failed to add group");
    }
    groups
        .add_named(3, &[cube.volume.into()], Some(7), "bulk")
        .expect("Failed to add group");

    let mesh = MeshGenerator::new(&constraints)
        .with_groups(&groups)
        .generate()
        .expect("Failed to generate mesh");
    println!(
        "Generated mesh: {} nodes, {} hexahedra",
        mesh.num_nodes(),
        mesh.count(ElementKind::Hexahedron)
    );

    msh::save(&mesh, "hex_block.msh").expect("Failed to save MSH");
    println!("Saved hex_block.msh");
}
