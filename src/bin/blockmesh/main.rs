//! Blockmesh CLI - generate structured block meshes.
//!
//! Usage: blockmesh <COMMAND> [OPTIONS] <OUTPUT>
//!
//! Run `blockmesh --help` for available commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use blockmesh::algo::triangulate::{DelaunayTriangulator, PointLayout};
use blockmesh::algo::Progress;
use blockmesh::geometry::{primitives, GeometryBuilder};
use blockmesh::io::{self, msh, Format};
use blockmesh::mesh::{
    ElementKind, Mesh, MeshAlgorithm, MeshConstraints, MeshGenerator, MeshOptions, PhysicalGroups,
};

#[derive(Parser)]
#[command(name = "blockmesh")]
#[command(author, version, about = "Structured block mesh generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mesh a rectangle with structured quadrangles
    Rectangle {
        /// Length along x
        #[arg(long, default_value = "2.0")]
        length: f64,

        /// Height along y
        #[arg(long, default_value = "1.0")]
        height: f64,

        /// Segments along x
        #[arg(long, default_value = "10")]
        nx: usize,

        /// Segments along y
        #[arg(long, default_value = "5")]
        ny: usize,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Mesh a box with structured hexahedra
    Hexahedron {
        /// Length along x
        #[arg(long, default_value = "1.0")]
        length: f64,

        /// Width along y
        #[arg(long, default_value = "0.1")]
        width: f64,

        /// Height along z
        #[arg(long, default_value = "0.04")]
        height: f64,

        /// Segments along x
        #[arg(long, default_value = "60")]
        nx: usize,

        /// Segments along y
        #[arg(long, default_value = "10")]
        ny: usize,

        /// Segments along z
        #[arg(long, default_value = "5")]
        nz: usize,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Mesh a split square: structured quads on the left, free mesh on the right
    Mixed {
        /// Side length
        #[arg(long, default_value = "1.0")]
        side: f64,

        /// Target element size
        #[arg(long, default_value = "0.1")]
        size: f64,

        /// Interior point layout of the free half
        #[arg(long, value_enum, default_value = "square")]
        layout: Layout,

        /// Leave the free half as triangles
        #[arg(long)]
        triangles: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output mesh file (.msh or .vtk)
    output: PathBuf,

    /// Also write elements outside every physical group (MSH only)
    #[arg(long)]
    save_all: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Square grid aligned with the first boundary side
    Square,
    /// Staggered rows (near-equilateral triangles)
    Staggered,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Rectangle {
            length,
            height,
            nx,
            ny,
            out,
        } => cmd_rectangle(length, height, nx, ny, &out),

        Commands::Hexahedron {
            length,
            width,
            height,
            nx,
            ny,
            nz,
            out,
        } => cmd_hexahedron([length, width, height], [nx, ny, nz], &out),

        Commands::Mixed {
            side,
            size,
            layout,
            triangles,
            out,
        } => cmd_mixed(side, size, layout, triangles, &out),
    }
}

/// Create a progress reporter that draws a bar on stderr.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }
        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic; redraw only when the percentage grows
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {:<20}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}

fn options(out: &OutputArgs) -> MeshOptions {
    MeshOptions::default().with_parallel(!out.sequential)
}

fn generate(generator: MeshGenerator<'_>, out: &OutputArgs) -> CliResult<Mesh> {
    let mode = if out.sequential { "sequential" } else { "parallel" };
    println!("Generating mesh ({})...", mode);

    let start = Instant::now();
    let mesh = if out.progress {
        generator.generate_with_progress(&create_progress())?
    } else {
        generator.generate()?
    };
    let elapsed = start.elapsed();

    println!(
        "Generated: {} nodes, {} elements ({:.2?})",
        mesh.num_nodes(),
        mesh.num_elements(),
        elapsed
    );
    for kind in [
        ElementKind::Line,
        ElementKind::Triangle,
        ElementKind::Quadrangle,
        ElementKind::Hexahedron,
    ] {
        let n = mesh.count(kind);
        if n > 0 {
            println!("  {:?}: {}", kind, n);
        }
    }
    Ok(mesh)
}

fn save(mesh: &Mesh, out: &OutputArgs) -> CliResult<()> {
    for id in mesh.group_ids() {
        let group = mesh.group(id);
        let name = group
            .name
            .as_deref()
            .map(|n| format!(" \"{}\"", n))
            .unwrap_or_default();
        println!(
            "  Group {}{} (dim {}): {} elements",
            group.tag,
            name,
            group.dim,
            mesh.group_elements(id).len()
        );
    }

    let start = Instant::now();
    match Format::from_path(&out.output) {
        Some(Format::Msh) => msh::save_with_options(
            mesh,
            &out.output,
            &msh::MshOptions::default().with_save_all(out.save_all),
        )?,
        _ => io::save(mesh, &out.output)?,
    }
    println!("Saved: {} ({:.2?})", out.output.display(), start.elapsed());
    Ok(())
}

fn cmd_rectangle(length: f64, height: f64, nx: usize, ny: usize, out: &OutputArgs) -> CliResult<()> {
    let mut b = GeometryBuilder::new();
    let rect = primitives::rectangle(&mut b, length, height, None)?;
    let geometry = b.synchronize();

    let mut constraints = MeshConstraints::new(&geometry);
    for (edge, n) in rect.edges.iter().zip([nx, ny, nx, ny]) {
        constraints.set_edge_subdivision(*edge, n)?;
    }
    constraints.mark_face_transfinite(rect.face, None)?;
    constraints.set_recombine(rect.face)?;

    let mut groups = PhysicalGroups::new(&geometry);
    for (tag, edge) in (1..).zip(rect.edges) {
        groups.add(1, &[edge.into()], Some(tag))?;
    }
    groups.add(2, &[rect.face.into()], Some(5))?;

    println!("Rectangle {} x {}, {} x {} segments", length, height, nx, ny);
    let generator = MeshGenerator::new(&constraints)
        .with_groups(&groups)
        .with_options(options(out).with_dimension(2));
    let mesh = generate(generator, out)?;
    save(&mesh, out)
}

fn cmd_hexahedron(size: [f64; 3], counts: [usize; 3], out: &OutputArgs) -> CliResult<()> {
    let [length, width, height] = size;
    let mut b = GeometryBuilder::new();
    let cube = primitives::cuboid(&mut b, length, width, height, None)?;
    let geometry = b.synchronize();

    let mut constraints = MeshConstraints::new(&geometry);
    for (edges, n) in [
        (cube.x_edges(), counts[0]),
        (cube.y_edges(), counts[1]),
        (cube.z_edges(), counts[2]),
    ] {
        for edge in edges {
            constraints.set_edge_subdivision(edge, n)?;
        }
    }
    for face in cube.faces {
        constraints.mark_face_transfinite(face, None)?;
        constraints.set_recombine(face)?;
    }
    constraints.mark_volume_transfinite(cube.volume)?;
    constraints.set_recombine(cube.volume)?;

    let mut groups = PhysicalGroups::new(&geometry);
    let names = ["bottom", "top", "front", "left", "back", "right"];
    for ((tag, face), name) in (1..).zip(cube.faces).zip(names) {
        groups.add_named(2, &[face.into()], Some(tag), name)?;
    }
    groups.add_named(3, &[cube.volume.into()], Some(7), "bulk")?;

    println!(
        "Box {} x {} x {}, {} x {} x {} segments",
        length, width, height, counts[0], counts[1], counts[2]
    );
    let generator = MeshGenerator::new(&constraints)
        .with_groups(&groups)
        .with_options(options(out));
    let mesh = generate(generator, out)?;
    save(&mesh, out)
}

fn cmd_mixed(side: f64, size: f64, layout: Layout, triangles: bool, out: &OutputArgs) -> CliResult<()> {
    let mut b = GeometryBuilder::new();
    let sq = primitives::split_square(&mut b, side, None)?;
    let geometry = b.synchronize();

    let mut constraints = MeshConstraints::new(&geometry);
    constraints.set_size(&sq.points, size)?;

    // Left half: structured, counts follow the target size
    let [l1, _, _, _, l5, l6, l7] = sq.edges;
    let across = ((0.5 * side / size).round() as usize).max(2);
    let along = ((side / size).round() as usize).max(2);
    for (edge, n) in [(l1, across), (l7, along), (l5, across), (l6, along)] {
        constraints.set_edge_subdivision(edge, n)?;
    }
    constraints.mark_face_transfinite(sq.left, None)?;
    constraints.set_recombine(sq.left)?;

    constraints.set_algorithm(sq.right, MeshAlgorithm::MeshAdapt)?;
    if !triangles {
        constraints.set_recombine(sq.right)?;
    }

    let mut groups = PhysicalGroups::new(&geometry);
    groups.add_named(2, &[sq.left.into()], None, "QuadRegion")?;
    groups.add_named(2, &[sq.right.into()], None, "TriangleRegion")?;

    let layout = match layout {
        Layout::Square => PointLayout::Square,
        Layout::Staggered => PointLayout::Staggered,
    };
    println!("Split square {}, target size {}", side, size);
    let generator = MeshGenerator::new(&constraints)
        .with_groups(&groups)
        .with_options(options(out).with_dimension(2))
        .with_triangulator(DelaunayTriangulator::new().with_layout(layout));
    let mesh = generate(generator, out)?;
    save(&mesh, out)
}
