//! Benchmarks for octree construction and both query modes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hdscrate_core::{Point3f, TriangleMesh};
use hdscrate_simplification::{HdsParams, Octree};

fn generate_grid_mesh(size: usize) -> TriangleMesh {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(
                x as f32,
                y as f32,
                (fx.sin() * fy.sin()) * 2.0,
            ));
        }
    }
    let mut faces = Vec::with_capacity((size - 1) * (size - 1) * 2);
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, bl, tr]);
            faces.push([tr, bl, br]);
        }
    }
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let params = HdsParams::default();

    for &size in &[20, 40, 80] {
        let mesh = generate_grid_mesh(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}f", mesh.face_count())),
            &mesh,
            |b, mesh| {
                b.iter(|| {
                    let octree = Octree::from_mesh(black_box(mesh), &params).unwrap();
                    black_box(octree.stats().node_count);
                });
            },
        );
    }

    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold");
    let mesh = generate_grid_mesh(60);
    let mut octree = Octree::from_mesh(&mesh, &HdsParams::default()).unwrap();

    for &threshold in &[0.0f32, 0.05, 0.2, 0.5] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("t{}", (threshold * 100.0) as u32)),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    // Alternate with the coarsest cut so each iteration moves the tree
                    octree.apply_threshold(1.0).unwrap();
                    let lod = octree.query_by_threshold(black_box(threshold)).unwrap();
                    black_box(lod.len());
                });
            },
        );
    }

    group.finish();
}

fn bench_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("budget");
    let mesh = generate_grid_mesh(60);
    let mut octree = Octree::from_mesh(&mesh, &HdsParams::default()).unwrap();
    let total = octree.original_triangle_count();

    for &fraction in &[0.7f32, 0.3, 0.05] {
        let budget = (total as f32 * fraction) as usize;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("b{}", budget)),
            &budget,
            |b, &budget| {
                b.iter(|| {
                    let lod = octree.query_by_budget(black_box(budget));
                    black_box(lod.len());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_threshold, bench_budget);
criterion_main!(benches);
