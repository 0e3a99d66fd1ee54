//! Boundary classification utilities.
//!
//! These helpers list the boundary and interior entities of a mesh from its
//! stored boundary flags, stamp them into label attributes, and extract the
//! boundary surface of a polyhedral mesh.

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::attributes::{AttributeSchema, Labeled, StdAttributes};
use crate::topology::ids::{DenseId, EdgeId, FaceId, PolyId, VertId};
use crate::topology::query::MeshTopology;
use crate::topology::surface::SurfaceMesh;
use crate::topology::volume::{VolumeKind, VolumeMesh};

/// Label values for boundary classification.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryLabelValues {
    pub boundary: i32,
    pub interior: i32,
}

impl Default for BoundaryLabelValues {
    fn default() -> Self {
        Self {
            boundary: 1,
            interior: 0,
        }
    }
}

/// Classified boundary / interior id lists, each sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryClassification<I> {
    pub boundary: Vec<I>,
    pub interior: Vec<I>,
}

impl<I> Default for BoundaryClassification<I> {
    fn default() -> Self {
        Self {
            boundary: Vec::new(),
            interior: Vec::new(),
        }
    }
}

fn split<I: DenseId>(count: usize, is_boundary: impl Fn(I) -> bool) -> BoundaryClassification<I> {
    let mut out = BoundaryClassification::default();
    for i in 0..count {
        let id = I::from_index(i);
        if is_boundary(id) {
            out.boundary.push(id);
        } else {
            out.interior.push(id);
        }
    }
    out
}

pub fn classify_verts<M: MeshTopology>(mesh: &M) -> BoundaryClassification<VertId> {
    split(mesh.num_verts(), |v| mesh.vert_is_boundary(v))
}

pub fn classify_edges<M: MeshTopology>(mesh: &M) -> BoundaryClassification<EdgeId> {
    split(mesh.num_edges(), |e| mesh.edge_is_boundary(e))
}

pub fn classify_faces<K: VolumeKind, A: AttributeSchema>(
    mesh: &VolumeMesh<K, A>,
) -> BoundaryClassification<FaceId> {
    split(mesh.num_faces(), |f| mesh.face_is_boundary(f))
}

/// Polygons with at least one boundary edge versus the rest.
pub fn classify_surface_polys<A: AttributeSchema>(mesh: &SurfaceMesh<A>) -> BoundaryClassification<PolyId> {
    split(mesh.num_polys(), |p| mesh.poly_is_on_surf(p))
}

pub fn classify_volume_polys<K: VolumeKind, A: AttributeSchema>(
    mesh: &VolumeMesh<K, A>,
) -> BoundaryClassification<PolyId> {
    split(mesh.num_polys(), |p| mesh.poly_is_on_surf(p))
}

/// Classifies vertices and writes `values` into their labels.
pub fn label_boundary_verts<M>(mesh: &mut M, values: BoundaryLabelValues) -> BoundaryClassification<VertId>
where
    M: MeshTopology,
    <M::Attr as AttributeSchema>::Vert: Labeled,
{
    let cls = classify_verts(mesh);
    for &v in &cls.boundary {
        mesh.vert_attr_mut(v).set_label(values.boundary);
    }
    for &v in &cls.interior {
        mesh.vert_attr_mut(v).set_label(values.interior);
    }
    cls
}

/// Classifies edges and writes `values` into their labels.
pub fn label_boundary_edges<M>(mesh: &mut M, values: BoundaryLabelValues) -> BoundaryClassification<EdgeId>
where
    M: MeshTopology,
    <M::Attr as AttributeSchema>::Edge: Labeled,
{
    let cls = classify_edges(mesh);
    for &e in &cls.boundary {
        mesh.edge_attr_mut(e).set_label(values.boundary);
    }
    for &e in &cls.interior {
        mesh.edge_attr_mut(e).set_label(values.interior);
    }
    cls
}

/// Classifies faces and writes `values` into their labels.
pub fn label_boundary_faces<K, A>(
    mesh: &mut VolumeMesh<K, A>,
    values: BoundaryLabelValues,
) -> BoundaryClassification<FaceId>
where
    K: VolumeKind,
    A: AttributeSchema,
    A::Face: Labeled,
{
    let cls = classify_faces(mesh);
    for &f in &cls.boundary {
        mesh.face_attr_mut(f).set_label(values.boundary);
    }
    for &f in &cls.interior {
        mesh.face_attr_mut(f).set_label(values.interior);
    }
    cls
}

/// Boundary surface of a polyhedral mesh together with, for each surface
/// vertex, the volume vertex it came from.
#[derive(Clone, Debug)]
pub struct BoundarySurface {
    pub mesh: SurfaceMesh<StdAttributes>,
    pub vert_map: Vec<VertId>,
}

/// Extracts the boundary faces that belong to a poly as a polygon mesh,
/// with every ring oriented out of its poly. Faces without a poly are left
/// out.
pub fn extract_boundary_surface<K: VolumeKind, A: AttributeSchema>(
    mesh: &VolumeMesh<K, A>,
) -> Result<BoundarySurface, MeshError> {
    let mut remap: HashMap<VertId, VertId> = HashMap::new();
    let mut vert_map = Vec::new();
    let mut verts = Vec::new();
    let mut polys = Vec::new();
    for f in (0..mesh.num_faces()).map(FaceId::new) {
        let [p] = mesh.adj_f2p(f) else {
            continue;
        };
        let mut ring: Vec<VertId> = Vec::with_capacity(mesh.face_verts(f).len());
        for &v in mesh.face_verts(f) {
            let local = *remap.entry(v).or_insert_with(|| {
                vert_map.push(v);
                verts.push(mesh.vert(v));
                VertId::new(verts.len() - 1)
            });
            ring.push(local);
        }
        if mesh.poly_face_winding(*p, f) == Some(false) {
            ring.reverse();
        }
        polys.push(ring);
    }
    log::debug!(
        "extracted boundary surface: {} verts, {} polys",
        verts.len(),
        polys.len()
    );
    let surface = SurfaceMesh::from_polys_with(verts, polys, *mesh.options())?;
    Ok(BoundarySurface {
        mesh: surface,
        vert_map,
    })
}
