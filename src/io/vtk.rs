//! Legacy VTK ASCII export.
//!
//! Writes an `UNSTRUCTURED_GRID` with every node and the elements of the
//! highest dimension present, plus a `gmsh:physical` cell scalar holding
//! each cell's first physical tag (0 when ungrouped).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Save a mesh as a legacy VTK file.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Write a mesh as legacy VTK to any writer.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# vtk DataFile Version 2.0")?;
    writeln!(writer, "blockmesh")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(writer, "POINTS {} double", mesh.num_nodes())?;
    for p in mesh.nodes() {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }

    let dim = mesh.max_dim().unwrap_or(0);
    let cells: Vec<_> = mesh
        .element_ids()
        .filter(|&id| mesh.element(id).kind.dim() == dim)
        .collect();
    let size: usize = cells.iter().map(|&id| mesh.element(id).nodes.len() + 1).sum();

    writeln!(writer, "CELLS {} {}", cells.len(), size)?;
    for &id in &cells {
        let el = mesh.element(id);
        write!(writer, "{}", el.nodes.len())?;
        for node in &el.nodes {
            write!(writer, " {}", node.index())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "CELL_TYPES {}", cells.len())?;
    for &id in &cells {
        writeln!(writer, "{}", mesh.element(id).kind.vtk_type())?;
    }

    writeln!(writer, "CELL_DATA {}", cells.len())?;
    writeln!(writer, "SCALARS gmsh:physical int 1")?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for &id in &cells {
        let tag = mesh.physical_tags(id).first().copied().unwrap_or(0);
        writeln!(writer, "{}", tag)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{primitives, GeometryBuilder};
    use crate::mesh::{MeshConstraints, MeshGenerator, PhysicalGroups};

    #[test]
    fn test_hex_block() {
        let mut b = GeometryBuilder::new();
        let cube = primitives::cuboid(&mut b, 1.0, 1.0, 1.0, None).unwrap();
        let g = b.synchronize();
        let mut c = MeshConstraints::new(&g);
        for e in cube.edges {
            c.set_edge_subdivision(e, 2).unwrap();
        }
        for f in cube.faces {
            c.mark_face_transfinite(f, None).unwrap();
        }
        c.mark_volume_transfinite(cube.volume).unwrap();
        let mut groups = PhysicalGroups::new(&g);
        groups.add(3, &[cube.volume.into()], Some(9)).unwrap();
        let mesh = MeshGenerator::new(&c).with_groups(&groups).generate().unwrap();

        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("POINTS 27 double"));
        assert!(text.contains("CELLS 8 72"));
        let types: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("CELL_TYPES"))
            .skip(1)
            .take(8)
            .collect();
        assert!(types.iter().all(|t| *t == "12"));
        assert_eq!(text.lines().last(), Some("9"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rect.vtk");
        let mut b = GeometryBuilder::new();
        let r = primitives::rectangle(&mut b, 1.0, 1.0, None).unwrap();
        let g = b.synchronize();
        let mut c = MeshConstraints::new(&g);
        for e in r.edges {
            c.set_edge_subdivision(e, 3).unwrap();
        }
        c.mark_face_transfinite(r.face, None).unwrap();
        let mesh = MeshGenerator::new(&c).generate().unwrap();
        save(&mesh, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("CELLS 9 45"));
        assert!(text.contains("CELL_DATA 9"));
    }
}
