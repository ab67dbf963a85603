//! hemesh CLI - build procedural meshes, inspect and subdivide them.
//!
//! Usage: hemesh <COMMAND> [OPTIONS]
//!
//! Run `hemesh --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use hemesh::algo::subdivide::{self, SubdivideOptions};
use hemesh::io;
use hemesh::mesh::{from_triangles, primitives, to_triangles, HalfEdgeMesh};

#[derive(Parser)]
#[command(name = "hemesh")]
#[command(author, version, about = "Half-edge mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Shape to build
        #[arg(short, long, value_enum, default_value = "icosahedron")]
        shape: Shape,

        /// Cells per side for the grid shape
        #[arg(long, default_value = "4")]
        cells: usize,
    },

    /// Loop-subdivide a mesh
    Subdivide {
        /// Shape to build
        #[arg(short, long, value_enum, default_value = "icosahedron")]
        shape: Shape,

        /// Cells per side for the grid shape
        #[arg(long, default_value = "4")]
        cells: usize,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Reposition vertices on the rayon thread pool
        #[arg(long)]
        parallel: bool,

        /// Output OBJ file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Shape {
    /// Unit cube (quads, triangulated before subdivision)
    Cube,
    /// Tetrahedron
    Tetrahedron,
    /// Icosahedron
    Icosahedron,
    /// Open triangulated square
    Grid,
}

fn main() {
    init_logger();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { shape, cells } => {
            cmd_info(shape, cells)?;
        }

        Commands::Subdivide {
            shape,
            cells,
            iterations,
            parallel,
            output,
        } => {
            cmd_subdivide(shape, cells, iterations, parallel, output.as_deref())?;
        }
    }

    Ok(())
}

fn build(shape: Shape, cells: usize) -> hemesh::error::Result<HalfEdgeMesh> {
    match shape {
        Shape::Cube => primitives::cube(),
        Shape::Tetrahedron => primitives::tetrahedron(),
        Shape::Icosahedron => primitives::icosahedron(),
        Shape::Grid => primitives::grid(cells),
    }
}

fn cmd_info(shape: Shape, cells: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = build(shape, cells)?;

    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Edges: {}", mesh.num_edges());

    let euler = mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
    println!("Euler characteristic: {}", euler);

    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else {
        println!("Mesh type: Polygon mesh");
    }

    let boundary = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary half-edges)", boundary);
    }

    match mesh.check_invariants() {
        Ok(()) => println!("Invariants: ok"),
        Err(violation) => println!("Invariants: {}", violation),
    }

    Ok(())
}

fn cmd_subdivide(
    shape: Shape,
    cells: usize,
    iterations: usize,
    parallel: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = build(shape, cells)?;
    if !mesh.is_triangle_mesh() {
        let (positions, triangles) = to_triangles(&mesh);
        mesh = from_triangles(&positions, &triangles)?;
        log::info!("triangulated input into {} faces", mesh.num_faces());
    }

    println!("Input: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let options = SubdivideOptions::new(iterations).with_parallel(parallel);
    let mode = if parallel { "parallel" } else { "sequential" };

    println!("Applying Loop subdivision ({} iterations, {})...", iterations, mode);
    let start = Instant::now();
    let result = subdivide::loop_subdivide(&mesh, &options)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} faces ({:.2?})",
        result.num_vertices(),
        result.num_faces(),
        elapsed
    );

    if let Some(path) = output {
        io::save(&result, path)?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}
