#![allow(dead_code)]
use polymesh_topology::prelude::*;

pub fn vid(i: usize) -> VertId {
    VertId::new(i)
}

pub fn vs(ids: &[usize]) -> Vec<VertId> {
    ids.iter().copied().map(VertId::new).collect()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Corners of the box `[x0, x1] x [0, 1] x [0, 1]` in hexahedron order:
/// bottom ring counter-clockwise seen from above, then the top ring.
pub fn box_corners(x0: f64, x1: f64) -> Vec<[f64; 3]> {
    vec![
        [x0, 0.0, 0.0],
        [x1, 0.0, 0.0],
        [x1, 1.0, 0.0],
        [x0, 1.0, 0.0],
        [x0, 0.0, 1.0],
        [x1, 0.0, 1.0],
        [x1, 1.0, 1.0],
        [x0, 1.0, 1.0],
    ]
}

/// Outward-facing quads of the unit cube built on [`box_corners`].
pub fn cube_quads() -> Vec<Vec<VertId>> {
    vec![
        vs(&[0, 3, 2, 1]),
        vs(&[4, 5, 6, 7]),
        vs(&[0, 1, 5, 4]),
        vs(&[1, 2, 6, 5]),
        vs(&[2, 3, 7, 6]),
        vs(&[3, 0, 4, 7]),
    ]
}

/// Closed quad surface of the unit cube.
pub fn cube_surface() -> SurfaceMesh {
    SurfaceMesh::from_polys(box_corners(0.0, 1.0), cube_quads()).expect("cube surface")
}

/// Unit cube as a single polyhedron with six boundary faces.
pub fn unit_cube() -> VolumeMesh {
    let faces = cube_quads();
    let polys = vec![(0..6).map(FaceId::new).collect()];
    let winding = vec![vec![true; 6]];
    VolumeMesh::from_faces(box_corners(0.0, 1.0), faces, polys, winding).expect("unit cube")
}

/// Two unit hexahedra glued along the face `x = 1`.
pub fn two_cubes() -> HexMesh {
    let mut verts = box_corners(0.0, 1.0);
    verts.extend([[2.0, 0.0, 0.0], [2.0, 1.0, 0.0], [2.0, 0.0, 1.0], [2.0, 1.0, 1.0]]);
    let cells = vec![vs(&[0, 1, 2, 3, 4, 5, 6, 7]), vs(&[1, 8, 9, 2, 5, 10, 11, 6])];
    HexMesh::from_cells(verts, &cells).expect("two cubes")
}

/// A single tetrahedron with a right-angle corner at the origin.
pub fn unit_tet() -> TetMesh {
    let verts = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    TetMesh::from_cells(verts, &[vs(&[0, 1, 2, 3])]).expect("unit tet")
}

/// L-shaped hexagon in the `z = 0` plane, listed counter-clockwise.
pub fn l_hexagon() -> Vec<[f64; 3]> {
    vec![
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [2.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 2.0, 0.0],
        [0.0, 2.0, 0.0],
    ]
}

/// `n x n` grid of unit quads in the `z = 0` plane.
pub fn quad_grid(n: usize) -> SurfaceMesh {
    let mut verts = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            verts.push([i as f64, j as f64, 0.0]);
        }
    }
    let at = |i: usize, j: usize| VertId::new(j * (n + 1) + i);
    let mut polys = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            polys.push(vec![at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]);
        }
    }
    SurfaceMesh::from_polys(verts, polys).expect("quad grid")
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// `n x n x n` block of unit hexahedra.
pub fn hex_block(n: usize) -> HexMesh {
    let m = n + 1;
    let at = |i: usize, j: usize, k: usize| vid((k * m + j) * m + i);
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
    HexMesh::from_cells(verts, &cells).expect("hex block")
}
