//! Level-of-detail sweep over a procedural mesh
//!
//! Builds the decimation octree once, then prints how many triangles stay
//! visible for a range of error thresholds and triangle budgets.
//!
//! ```text
//! cargo run --bin lod_sweep -- sphere --resolution 32 --max-depth 7
//! ```

use std::f32::consts::PI;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use hdscrate_core::{Point3f, TriangleMesh};
use hdscrate_simplification::{HdsParams, HdsSimplifier, MeshSimplifier, Octree};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shape {
    /// Unit cube, 12 triangles
    Cube,
    /// Flat square grid
    Grid,
    /// UV sphere
    Sphere,
}

#[derive(Parser)]
#[command(name = "lod_sweep")]
#[command(about = "Sweep thresholds and budgets over a decimation octree", long_about = None)]
struct Cli {
    /// Mesh to build
    #[arg(value_enum, default_value = "sphere")]
    shape: Shape,

    /// Grid cells per side, or sphere segments
    #[arg(long, default_value_t = 24)]
    resolution: usize,

    /// Octree depth limit
    #[arg(long, default_value_t = 8)]
    max_depth: u32,

    /// Threshold steps between 0 and 1
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Also run the MeshSimplifier front end at this reduction ratio
    #[arg(long)]
    ratio: Option<f32>,
}

fn make_cube() -> TriangleMesh {
    let vertices = (0..8)
        .map(|i| Point3f::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32))
        .collect();
    let faces = vec![
        [0, 2, 1], [1, 2, 3],
        [4, 5, 6], [5, 7, 6],
        [0, 1, 4], [1, 5, 4],
        [2, 6, 3], [3, 6, 7],
        [0, 4, 2], [2, 4, 6],
        [1, 3, 5], [3, 7, 5],
    ];
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

fn make_grid(cells: usize) -> TriangleMesh {
    let n = cells + 1;
    let mut mesh = TriangleMesh::new();
    for y in 0..n {
        for x in 0..n {
            mesh.add_vertex(Point3f::new(x as f32, y as f32, 0.0));
        }
    }
    for y in 0..cells {
        for x in 0..cells {
            let tl = y * n + x;
            let bl = tl + n;
            mesh.add_face([tl, bl, tl + 1]);
            mesh.add_face([tl + 1, bl, bl + 1]);
        }
    }
    mesh
}

fn make_sphere(segments: usize) -> TriangleMesh {
    let rings = segments / 2;
    let mut mesh = TriangleMesh::new();
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..segments {
            let phi = 2.0 * PI * s as f32 / segments as f32;
            mesh.add_vertex(Point3f::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    for r in 0..rings {
        for s in 0..segments {
            let a = r * segments + s;
            let b = r * segments + (s + 1) % segments;
            let c = a + segments;
            let d = b + segments;
            if r != 0 {
                mesh.add_face([a, c, b]);
            }
            if r + 1 != rings {
                mesh.add_face([b, c, d]);
            }
        }
    }
    let normals = mesh.vertices.iter().map(|p| p.coords).collect();
    mesh.set_normals(normals);
    mesh
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(cli.resolution >= 2, "resolution must be at least 2");
    ensure!(cli.steps >= 1, "steps must be at least 1");

    let mesh = match cli.shape {
        Shape::Cube => make_cube(),
        Shape::Grid => make_grid(cli.resolution),
        Shape::Sphere => make_sphere(cli.resolution),
    };
    let params = HdsParams::with_max_depth(cli.max_depth);
    let mut octree = Octree::from_mesh(&mesh, &params)?;

    println!("{:?}: {} vertices, {} triangles", cli.shape, mesh.vertex_count(), mesh.face_count());
    println!("Octree: {}", octree.stats());
    println!("Dismissed at full resolution: {}", octree.dismissed_triangle_count());

    println!("\nThreshold sweep:");
    for step in 0..=cli.steps {
        let threshold = step as f32 / cli.steps as f32;
        let lod = octree.query_by_threshold(threshold)?;
        println!("  t = {:.2}  ->  {:6} triangles", threshold, lod.len());
    }

    println!("\nBudget sweep:");
    let total = octree.original_triangle_count();
    for budget in [total, total / 2, total / 4, total / 8, total / 16] {
        let lod = octree.query_by_budget(budget);
        let welded = lod.to_triangle_mesh();
        println!(
            "  budget {:6}  ->  {:6} triangles, {:6} vertices",
            budget,
            lod.len(),
            welded.vertex_count()
        );
    }

    if let Some(ratio) = cli.ratio {
        let simplified = HdsSimplifier::with_params(params).simplify(&mesh, ratio)?;
        println!(
            "\nMeshSimplifier at ratio {:.2}: {} -> {} faces",
            ratio,
            mesh.face_count(),
            simplified.face_count()
        );
    }

    Ok(())
}
