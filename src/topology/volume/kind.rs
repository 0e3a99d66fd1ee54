//! Element kinds of polyhedral meshes.
//!
//! A [`VolumeKind`] supplies what depends on the element type: the face
//! table of a reference cell (for [`VolumeMesh::from_cells`]), the face
//! normal and the poly volume. Kinds are zero-sized and dispatched
//! statically.

use std::fmt::Debug;

use crate::geometry::metrics::{
    centroid, cross, newell_normal, normalize, signed_tet_volume, sub, triangle_cross,
};
use crate::topology::attributes::AttributeSchema;
use crate::topology::ids::PolyId;
use crate::topology::query::MeshTopology;
use crate::topology::volume::VolumeMesh;

/// Element-type hooks of a [`VolumeMesh`].
pub trait VolumeKind: Clone + Copy + Debug + Default + 'static {
    /// Human readable name, used in error messages.
    const NAME: &'static str;

    /// Number of vertices of a reference cell, when the kind has one.
    const CELL_SIZE: Option<usize> = None;

    /// Faces of a reference cell as local vertex indices, each ring
    /// counter-clockwise seen from outside the cell.
    const CELL_FACES: Option<&'static [&'static [usize]]> = None;

    /// Unit normal of a face ring following the right-hand rule, or zero
    /// when the ring is degenerate.
    fn face_normal(points: &[[f64; 3]]) -> [f64; 3] {
        normalize(newell_normal(points)).unwrap_or([0.0; 3])
    }

    /// Volume of poly `p`.
    fn poly_volume<A: AttributeSchema>(mesh: &VolumeMesh<Self, A>, p: PolyId) -> f64;
}

/// Tetrahedral meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tetrahedra;

/// Hexahedral meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hexahedra;

/// General polyhedral meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polyhedra;

const TET_FACES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]];

const HEX_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[1, 2, 6, 5],
    &[4, 5, 6, 7],
    &[3, 0, 4, 7],
    &[0, 1, 5, 4],
    &[2, 3, 7, 6],
];

impl VolumeKind for Tetrahedra {
    const NAME: &'static str = "tetrahedra";
    const CELL_SIZE: Option<usize> = Some(4);
    const CELL_FACES: Option<&'static [&'static [usize]]> = Some(TET_FACES);

    fn face_normal(points: &[[f64; 3]]) -> [f64; 3] {
        match points {
            [a, b, c] => normalize(triangle_cross(*a, *b, *c)).unwrap_or([0.0; 3]),
            _ => normalize(newell_normal(points)).unwrap_or([0.0; 3]),
        }
    }

    fn poly_volume<A: AttributeSchema>(mesh: &VolumeMesh<Self, A>, p: PolyId) -> f64 {
        match mesh.adj_p2v(p) {
            [a, b, c, d] => {
                signed_tet_volume(mesh.vert(*a), mesh.vert(*b), mesh.vert(*c), mesh.vert(*d)).abs()
            }
            _ => divergence_volume(mesh, p),
        }
    }
}

impl VolumeKind for Hexahedra {
    const NAME: &'static str = "hexahedra";
    const CELL_SIZE: Option<usize> = Some(8);
    const CELL_FACES: Option<&'static [&'static [usize]]> = Some(HEX_FACES);

    /// Cross product of the two diagonals, which does not depend on the
    /// choice of split for a non-planar quad.
    fn face_normal(points: &[[f64; 3]]) -> [f64; 3] {
        match points {
            [a, b, c, d] => {
                normalize(cross(sub(*c, *a), sub(*d, *b))).unwrap_or([0.0; 3])
            }
            _ => normalize(newell_normal(points)).unwrap_or([0.0; 3]),
        }
    }

    /// Quad faces are split along both diagonals and the two volumes averaged.
    fn poly_volume<A: AttributeSchema>(mesh: &VolumeMesh<Self, A>, p: PolyId) -> f64 {
        let apex = mesh.poly_centroid(p);
        let mut vol = 0.0;
        for (f, outward) in mesh.poly_oriented_faces(p) {
            let mut ring: Vec<[f64; 3]> = mesh.face_verts(f).iter().map(|&v| mesh.vert(v)).collect();
            if !outward {
                ring.reverse();
            }
            vol += match ring[..] {
                [a, b, c, d] => {
                    let split_ac = signed_tet_volume(a, b, c, apex) + signed_tet_volume(a, c, d, apex);
                    let split_bd = signed_tet_volume(a, b, d, apex) + signed_tet_volume(b, c, d, apex);
                    0.5 * (split_ac + split_bd)
                }
                _ => mesh
                    .poly_face_triangles(p, f)
                    .map(|[a, b, c]| signed_tet_volume(a, b, c, apex))
                    .sum(),
            };
        }
        vol
    }
}

impl VolumeKind for Polyhedra {
    const NAME: &'static str = "polyhedra";

    fn poly_volume<A: AttributeSchema>(mesh: &VolumeMesh<Self, A>, p: PolyId) -> f64 {
        divergence_volume(mesh, p)
    }
}

/// Volume from the outward-oriented face tessellations, by summing the
/// signed tetrahedra they form with the poly centroid. Negative when the
/// windings point inward.
pub(crate) fn divergence_volume<K: VolumeKind, A: AttributeSchema>(
    mesh: &VolumeMesh<K, A>,
    p: PolyId,
) -> f64 {
    let apex = centroid(mesh.adj_p2v(p).iter().map(|&v| mesh.vert(v)));
    mesh.poly_oriented_faces(p)
        .flat_map(|(f, _)| mesh.poly_face_triangles(p, f))
        .map(|[a, b, c]| signed_tet_volume(a, b, c, apex))
        .sum()
}
