//! Gmsh MSH 2.2 ASCII export.
//!
//! Layout:
//!
//! ```text
//! $MeshFormat / 2.2 0 8 / $EndMeshFormat
//! $PhysicalNames   (named groups only)
//! $Nodes           id x y z
//! $Elements        id type 2 physical elementary node...
//! ```
//!
//! An element is written once per physical group of its dimension that
//! contains its entity. When the mesh has groups, elements outside every
//! group are skipped unless [`MshOptions::save_all`] is set; without groups
//! every element is written with physical tag 0.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Options for MSH export.
#[derive(Debug, Clone, Default)]
pub struct MshOptions {
    /// Write elements that belong to no physical group as well.
    pub save_all: bool,
}

impl MshOptions {
    /// Set whether ungrouped elements are written.
    pub fn with_save_all(mut self, save_all: bool) -> Self {
        self.save_all = save_all;
        self
    }
}

/// Save a mesh as MSH 2.2 with default options.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    save_with_options(mesh, path, &MshOptions::default())
}

/// Save a mesh as MSH 2.2.
pub fn save_with_options<P: AsRef<Path>>(mesh: &Mesh, path: P, options: &MshOptions) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer, options)
        .and_then(|_| writer.flush())
        .map_err(|e| MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Write a mesh as MSH 2.2 to any writer.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W, options: &MshOptions) -> std::io::Result<()> {
    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "2.2 0 8")?;
    writeln!(writer, "$EndMeshFormat")?;

    let named: Vec<_> = mesh.groups().iter().filter(|g| g.name.is_some()).collect();
    if !named.is_empty() {
        writeln!(writer, "$PhysicalNames")?;
        writeln!(writer, "{}", named.len())?;
        for g in named {
            writeln!(
                writer,
                "{} {} \"{}\"",
                g.dim,
                g.tag,
                g.name.as_deref().unwrap_or_default()
            )?;
        }
        writeln!(writer, "$EndPhysicalNames")?;
    }

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", mesh.num_nodes())?;
    for (i, p) in mesh.nodes().iter().enumerate() {
        writeln!(writer, "{} {} {} {}", i + 1, p.x, p.y, p.z)?;
    }
    writeln!(writer, "$EndNodes")?;

    // (element index, physical tag) per written line
    let grouped = !mesh.groups().is_empty();
    let mut lines: Vec<(usize, u32)> = Vec::new();
    for id in mesh.element_ids() {
        let tags = mesh.physical_tags(id);
        if tags.is_empty() {
            if !grouped || options.save_all {
                lines.push((id.index(), 0));
            }
        } else {
            lines.extend(tags.into_iter().map(|t| (id.index(), t)));
        }
    }

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", lines.len())?;
    for (n, &(e, physical)) in lines.iter().enumerate() {
        let el = &mesh.elements()[e];
        write!(
            writer,
            "{} {} 2 {} {}",
            n + 1,
            el.kind.gmsh_type(),
            physical,
            el.entity.tag()
        )?;
        for node in &el.nodes {
            write!(writer, " {}", node.tag())?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "$EndElements")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{primitives, GeometryBuilder};
    use crate::mesh::{MeshConstraints, MeshGenerator, MeshOptions, PhysicalGroups};

    fn section<'t>(text: &'t str, name: &str) -> Vec<&'t str> {
        let start = format!("${}", name);
        let end = format!("$End{}", name);
        text.lines()
            .skip_while(|l| *l != start)
            .skip(1)
            .take_while(|l| *l != end)
            .collect()
    }

    fn rectangle_text(tag_bottom: bool, options: &MshOptions) -> String {
        let mut b = GeometryBuilder::new();
        let r = primitives::rectangle(&mut b, 2.0, 1.0, None).unwrap();
        let g = b.synchronize();
        let mut c = MeshConstraints::new(&g);
        for (e, n) in r.edges.iter().zip([4, 2, 4, 2]) {
            c.set_edge_subdivision(*e, n).unwrap();
        }
        c.mark_face_transfinite(r.face, None).unwrap();
        let mut groups = PhysicalGroups::new(&g);
        groups.add_named(2, &[r.face.into()], Some(3), "bulk").unwrap();
        if tag_bottom {
            groups.add(1, &[r.edges[0].into()], Some(1)).unwrap();
        }
        let mesh = MeshGenerator::new(&c).with_groups(&groups).generate().unwrap();

        let mut out = Vec::new();
        write(&mesh, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_grouped_elements_only() {
        let text = rectangle_text(true, &MshOptions::default());
        assert!(text.starts_with("$MeshFormat\n2.2 0 8\n$EndMeshFormat\n"));
        assert_eq!(section(&text, "PhysicalNames"), vec!["1", "2 3 \"bulk\""]);

        let nodes = section(&text, "Nodes");
        assert_eq!(nodes[0], "15");

        let elements = section(&text, "Elements");
        // 8 quads + 4 bottom lines
        assert_eq!(elements[0], "12");
        let quads = elements[1..].iter().filter(|l| l.split(' ').nth(1) == Some("3")).count();
        assert_eq!(quads, 8);
        assert!(elements[1..]
            .iter()
            .filter(|l| l.split(' ').nth(1) == Some("1"))
            .all(|l| l.split(' ').nth(3) == Some("1")));
    }

    #[test]
    fn test_save_all() {
        let text = rectangle_text(false, &MshOptions::default().with_save_all(true));
        let elements = section(&text, "Elements");
        // 4 points + 12 lines + 8 quads
        assert_eq!(elements[0], "24");
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rect.msh");
        let mut b = GeometryBuilder::new();
        primitives::rectangle(&mut b, 1.0, 1.0, Some(0.5)).unwrap();
        let g = b.synchronize();
        let c = MeshConstraints::new(&g);
        let mesh = MeshGenerator::new(&c)
            .with_options(MeshOptions::default().with_dimension(1))
            .generate()
            .unwrap();
        save(&mesh, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        // 4 corner nodes plus one midpoint per side
        assert_eq!(section(&text, "Nodes")[0], "8");
        assert_eq!(section(&text, "Elements")[0], "12");
    }
}
