use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use polymesh_topology::geometry::tessellate;
use polymesh_topology::prelude::*;

/// `n x n x n` block of unit hexahedra.
fn hex_block(n: usize) -> (Vec<[f64; 3]>, Vec<Vec<VertId>>) {
    let m = n + 1;
    let at = |i: usize, j: usize, k: usize| VertId::new((k * m + j) * m + i);
    let mut verts = Vec::with_capacity(m * m * m);
    for k in 0..m {
        for j in 0..m {
            for i in 0..m {
                verts.push([i as f64, j as f64, k as f64]);
            }
        }
    }
    let mut cells = Vec::with_capacity(n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                cells.push(vec![
                    at(i, j, k),
                    at(i + 1, j, k),
                    at(i + 1, j + 1, k),
                    at(i, j + 1, k),
                    at(i, j, k + 1),
                    at(i + 1, j, k + 1),
                    at(i + 1, j + 1, k + 1),
                    at(i, j + 1, k + 1),
                ]);
            }
        }
    }
    (verts, cells)
}

/// `n x n` grid of unit quads.
fn quad_grid(n: usize) -> (Vec<[f64; 3]>, Vec<Vec<VertId>>) {
    let at = |i: usize, j: usize| VertId::new(j * (n + 1) + i);
    let verts = (0..=n)
        .flat_map(|j| (0..=n).map(move |i| [i as f64, j as f64, 0.0]))
        .collect();
    let polys = (0..n)
        .flat_map(|j| (0..n).map(move |i| vec![at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]))
        .collect();
    (verts, polys)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &n in &[8usize, 16] {
        let (verts, cells) = hex_block(n);
        group.bench_with_input(BenchmarkId::new("hex_from_cells", n), &n, |b, _| {
            b.iter(|| {
                let mesh = HexMesh::from_cells(verts.clone(), &cells).unwrap();
                black_box(mesh.num_faces());
            });
        });
    }

    for &n in &[32usize, 128] {
        let (verts, polys) = quad_grid(n);
        group.bench_with_input(BenchmarkId::new("quad_from_polys", n), &n, |b, _| {
            b.iter(|| {
                let mesh: SurfaceMesh = SurfaceMesh::from_polys(verts.clone(), polys.clone()).unwrap();
                black_box(mesh.num_edges());
            });
        });
    }

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let (verts, cells) = hex_block(8);
    let base = HexMesh::from_cells(verts, &cells).unwrap();

    c.bench_function("hex_remove_every_poly", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            while mesh.num_polys() > 0 {
                mesh.remove_poly(PolyId::new(mesh.num_polys() - 1)).unwrap();
            }
            black_box(mesh.num_verts());
        });
    });
}

/// Star-shaped ring with alternating radii, concave at every other corner.
fn star(n: usize) -> (Vec<[f64; 3]>, Vec<VertId>) {
    let verts = (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64;
            let r = if i % 2 == 0 { 1.0 } else { 0.6 };
            [r * t.cos(), r * t.sin(), 0.0]
        })
        .collect();
    (verts, (0..n).map(VertId::new).collect())
}

fn bench_tessellate(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessellate");
    let opts = TessellationOptions::default();

    for &n in &[16usize, 64, 256] {
        let (verts, ring) = star(n);
        group.bench_with_input(BenchmarkId::new("star", n), &n, |b, _| {
            b.iter(|| {
                let t = tessellate(black_box(&ring), &verts, &opts).unwrap();
                black_box(t.num_triangles());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_edit, bench_tessellate);
criterion_main!(benches);
