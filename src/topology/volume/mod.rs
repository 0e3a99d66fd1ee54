//! Polyhedral meshes: polys bounded by polygonal faces.
//!
//! On top of the vertex / edge / poly tables shared with surface meshes, a
//! [`VolumeMesh`] keeps a face layer. Every poly lists its faces together
//! with a winding flag per face: `true` when the stored face ring is
//! counter-clockwise seen from outside the poly.
//!
//! A face is boundary when fewer than two polys use it. Edges and vertices
//! are boundary when they touch a boundary face.

mod edit;
pub mod kind;

use std::marker::PhantomData;

use hashbrown::HashMap;

use crate::geometry::bbox::BoundingBox;
use crate::geometry::metrics::{centroid, triangle_area};
use crate::geometry::tessellate::{Tessellation, tessellate};
use crate::mesh_error::MeshError;
use crate::topology::attributes::{AttributeSchema, Labeled, StdAttributes, distinct_labels, ids_with_label};
use crate::topology::builder::{VolumeTables, build_volume, faces_with_equal_winding};
use crate::topology::connectivity::VolumeConnectivity;
use crate::topology::core::{MeshCore, same_vertex_set};
use crate::topology::ids::{EdgeId, FaceId, PolyId, VertId, canonical_pair};
use crate::topology::options::MeshOptions;
use crate::topology::query::{MeshTopology, delegate_mesh_topology};
use crate::topology::shape::PolyShape;

pub use kind::{Hexahedra, Polyhedra, Tetrahedra, VolumeKind};

/// A mesh of polyhedra, specialised by element kind `K`.
#[derive(Clone, Debug, Default)]
pub struct VolumeMesh<K: VolumeKind = Polyhedra, A: AttributeSchema = StdAttributes> {
    pub(crate) core: MeshCore<A>,
    /// Vertex ring of each face.
    pub(crate) faces: Vec<Vec<VertId>>,
    pub(crate) p2f: Vec<Vec<FaceId>>,
    /// Parallel to `p2f`.
    pub(crate) winding: Vec<Vec<bool>>,
    pub(crate) v2f: Vec<Vec<FaceId>>,
    pub(crate) e2f: Vec<Vec<FaceId>>,
    pub(crate) f2e: Vec<Vec<EdgeId>>,
    pub(crate) f2f: Vec<Vec<FaceId>>,
    pub(crate) f2p: Vec<Vec<PolyId>>,
    pub(crate) face_bnd: Vec<bool>,
    pub(crate) face_tess: Vec<Tessellation>,
    pub(crate) face_normals: Vec<[f64; 3]>,
    pub(crate) face_attrs: Vec<A::Face>,
    pub(crate) options: MeshOptions,
    kind: PhantomData<K>,
}

/// Tetrahedral mesh with standard attributes.
pub type TetMesh = VolumeMesh<Tetrahedra>;
/// Hexahedral mesh with standard attributes.
pub type HexMesh = VolumeMesh<Hexahedra>;

delegate_mesh_topology!([K: VolumeKind, A: AttributeSchema] VolumeMesh<K, A>, A);

impl<K: VolumeKind, A: AttributeSchema> VolumeMesh<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options. Cached tessellations are recomputed.
    pub fn with_options(mut self, options: MeshOptions) -> Result<Self, MeshError> {
        self.options = options;
        self.refresh_all_geometry()?;
        Ok(self)
    }

    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Builds a mesh from positions, face rings, poly face lists and windings.
    pub fn from_faces(
        verts: Vec<[f64; 3]>,
        faces: Vec<Vec<VertId>>,
        polys: Vec<Vec<FaceId>>,
        winding: Vec<Vec<bool>>,
    ) -> Result<Self, MeshError> {
        Self::from_faces_with(verts, faces, polys, winding, MeshOptions::default())
    }

    /// Same as [`from_faces`](Self::from_faces) with explicit options.
    pub fn from_faces_with(
        verts: Vec<[f64; 3]>,
        faces: Vec<Vec<VertId>>,
        polys: Vec<Vec<FaceId>>,
        winding: Vec<Vec<bool>>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        let tables = build_volume(verts.len(), &faces, &polys, &winding)?;
        let mut mesh = Self {
            options,
            ..Self::default()
        };
        mesh.core.bbox = BoundingBox::from_points(&verts);
        mesh.core.verts = verts;
        mesh.install(faces, polys, winding, tables)?;
        Ok(mesh)
    }

    /// Builds a mesh from per-cell vertex lists, using the reference face
    /// table of `K`. Faces shared by two cells are stored once; the first
    /// cell gets winding `true`, the second `false`.
    pub fn from_cells(verts: Vec<[f64; 3]>, cells: &[Vec<VertId>]) -> Result<Self, MeshError> {
        let (Some(size), Some(table)) = (K::CELL_SIZE, K::CELL_FACES) else {
            return Err(MeshError::UnsupportedKind(K::NAME));
        };
        let mut faces: Vec<Vec<VertId>> = Vec::new();
        let mut polys = Vec::with_capacity(cells.len());
        let mut winding = Vec::with_capacity(cells.len());
        let mut lookup: HashMap<Vec<VertId>, FaceId> = HashMap::new();
        for cell in cells {
            if cell.len() != size {
                return Err(MeshError::CellSizeMismatch {
                    expected: size,
                    found: cell.len(),
                });
            }
            let mut flist = Vec::with_capacity(table.len());
            let mut wlist = Vec::with_capacity(table.len());
            for local in table.iter() {
                let ring: Vec<VertId> = local.iter().map(|&i| cell[i]).collect();
                let mut key = ring.clone();
                key.sort_unstable();
                match lookup.get(&key) {
                    Some(&f) => {
                        flist.push(f);
                        wlist.push(false);
                    }
                    None => {
                        let f = FaceId::new(faces.len());
                        lookup.insert(key, f);
                        faces.push(ring);
                        flist.push(f);
                        wlist.push(true);
                    }
                }
            }
            polys.push(flist);
            winding.push(wlist);
        }
        Self::from_faces(verts, faces, polys, winding)
    }

    /// Rebuilds a mesh from an exported snapshot.
    pub fn from_connectivity(conn: VolumeConnectivity) -> Result<Self, MeshError> {
        Self::from_faces(conn.verts, conn.faces, conn.polys, conn.winding)
    }

    /// Snapshot of positions, faces, polys and windings.
    pub fn connectivity(&self) -> VolumeConnectivity {
        VolumeConnectivity {
            verts: self.core.verts.clone(),
            faces: self.faces.clone(),
            polys: self.p2f.clone(),
            winding: self.winding.clone(),
        }
    }

    fn install(
        &mut self,
        faces: Vec<Vec<VertId>>,
        polys: Vec<Vec<FaceId>>,
        winding: Vec<Vec<bool>>,
        tables: VolumeTables,
    ) -> Result<(), MeshError> {
        let VolumeTables {
            edges,
            v2v,
            v2e,
            v2f,
            v2p,
            e2f,
            e2p,
            f2e,
            f2f,
            f2p,
            p2v,
            p2e,
            p2p,
            vert_bnd,
            edge_bnd,
            face_bnd,
        } = tables;

        if self.options.check_winding {
            let bad = faces_with_equal_winding(&polys, &winding, &f2p);
            if !bad.is_empty() {
                log::warn!(
                    "{} shared faces have the same winding in both polys (first: {:?})",
                    bad.len(),
                    bad[0]
                );
            }
        }

        let core = &mut self.core;
        core.edge_attrs = vec![A::Edge::default(); edges.len()];
        core.edges = edges;
        core.v2v = v2v;
        core.v2e = v2e;
        core.v2p = v2p;
        core.e2p = e2p;
        core.p2v = p2v;
        core.p2e = p2e;
        core.p2p = p2p;
        core.vert_bnd = vert_bnd;
        core.edge_bnd = edge_bnd;
        core.vert_attrs.resize_with(core.verts.len(), Default::default);
        core.poly_attrs.resize_with(polys.len(), Default::default);
        self.face_attrs.resize_with(faces.len(), Default::default);
        self.faces = faces;
        self.p2f = polys;
        self.winding = winding;
        self.v2f = v2f;
        self.e2f = e2f;
        self.f2e = f2e;
        self.f2f = f2f;
        self.f2p = f2p;
        self.face_bnd = face_bnd;
        self.refresh_all_geometry()
    }

    /// Recomputes every derived table from positions, faces and polys.
    ///
    /// Edges used by no face are kept, and edge attributes follow their
    /// vertex pair. On error the mesh is left untouched.
    pub fn update_adjacency(&mut self) -> Result<(), MeshError> {
        let tables = build_volume(self.core.num_verts(), &self.faces, &self.p2f, &self.winding)?;

        let mut kept: HashMap<(VertId, VertId), A::Edge> = HashMap::with_capacity(self.core.num_edges());
        let mut loose = Vec::new();
        for (i, &[a, b]) in self.core.edges.iter().enumerate() {
            kept.insert(canonical_pair(a, b), self.core.edge_attrs[i].clone());
            if self.e2f[i].is_empty() {
                loose.push((a, b));
            }
        }

        let faces = std::mem::take(&mut self.faces);
        let polys = std::mem::take(&mut self.p2f);
        let winding = std::mem::take(&mut self.winding);
        self.install(faces, polys, winding, tables)?;
        for (a, b) in loose {
            self.new_edge(a, b);
        }
        for (i, &[a, b]) in self.core.edges.iter().enumerate() {
            if let Some(attr) = kept.remove(&canonical_pair(a, b)) {
                self.core.edge_attrs[i] = attr;
            }
        }
        Ok(())
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        *self = Self {
            options: self.options,
            ..Self::default()
        };
    }

    /// Recomputes the tight bounding box of the vertices.
    pub fn update_bbox(&mut self) {
        self.core.bbox = BoundingBox::from_points(&self.core.verts);
    }

    /// Moves vertex `v`, refreshing the geometry of its faces.
    pub fn set_vert(&mut self, v: VertId, pos: [f64; 3]) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        self.core.verts[v.idx()] = pos;
        self.core.bbox.extend(pos);
        for i in 0..self.v2f[v.idx()].len() {
            let f = self.v2f[v.idx()][i];
            self.refresh_face_geometry(f)?;
        }
        Ok(())
    }

    fn face_geometry(&self, f: FaceId) -> Result<(Tessellation, [f64; 3]), MeshError> {
        let ring = &self.faces[f.idx()];
        let tess = tessellate(ring, &self.core.verts, &self.options.tessellation)?;
        let points: Vec<[f64; 3]> = ring.iter().map(|v| self.core.verts[v.idx()]).collect();
        Ok((tess, K::face_normal(&points)))
    }

    pub(crate) fn refresh_face_geometry(&mut self, f: FaceId) -> Result<(), MeshError> {
        let (tess, normal) = self.face_geometry(f)?;
        self.face_tess[f.idx()] = tess;
        self.face_normals[f.idx()] = normal;
        Ok(())
    }

    fn refresh_all_geometry(&mut self) -> Result<(), MeshError> {
        let n = self.faces.len();
        let mut tess = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let (t, nrm) = self.face_geometry(FaceId::new(i))?;
            tess.push(t);
            normals.push(nrm);
        }
        self.face_tess = tess;
        self.face_normals = normals;
        Ok(())
    }

    pub(crate) fn refresh_face_boundary(&mut self, f: FaceId) {
        self.face_bnd[f.idx()] = self.f2p[f.idx()].len() < 2;
    }

    pub(crate) fn refresh_edge_boundary(&mut self, e: EdgeId) {
        let bnd = self.e2f[e.idx()].iter().any(|f| self.face_bnd[f.idx()]);
        self.core.edge_bnd[e.idx()] = bnd;
    }

    pub(crate) fn refresh_vert_boundary(&mut self, v: VertId) {
        let bnd = self.v2f[v.idx()].iter().any(|f| self.face_bnd[f.idx()]);
        self.core.vert_bnd[v.idx()] = bnd;
    }

    /// Re-derives the boundary flags of `faces`, of their edges and of their
    /// vertices, in that order.
    pub(crate) fn refresh_boundary_around(&mut self, faces: &[FaceId]) {
        for &f in faces {
            self.refresh_face_boundary(f);
        }
        for &f in faces {
            for i in 0..self.f2e[f.idx()].len() {
                let e = self.f2e[f.idx()][i];
                self.refresh_edge_boundary(e);
            }
            for i in 0..self.faces[f.idx()].len() {
                let v = self.faces[f.idx()][i];
                self.refresh_vert_boundary(v);
            }
        }
    }

    // ---- face layer ----------------------------------------------------

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertex ring of face `f`.
    #[inline]
    pub fn face_verts(&self, f: FaceId) -> &[VertId] {
        &self.faces[f.idx()]
    }

    #[inline]
    pub fn adj_v2f(&self, v: VertId) -> &[FaceId] {
        &self.v2f[v.idx()]
    }

    #[inline]
    pub fn adj_e2f(&self, e: EdgeId) -> &[FaceId] {
        &self.e2f[e.idx()]
    }

    #[inline]
    pub fn adj_f2e(&self, f: FaceId) -> &[EdgeId] {
        &self.f2e[f.idx()]
    }

    /// Faces sharing an edge with `f`.
    #[inline]
    pub fn adj_f2f(&self, f: FaceId) -> &[FaceId] {
        &self.f2f[f.idx()]
    }

    #[inline]
    pub fn adj_f2p(&self, f: FaceId) -> &[PolyId] {
        &self.f2p[f.idx()]
    }

    #[inline]
    pub fn adj_p2f(&self, p: PolyId) -> &[FaceId] {
        &self.p2f[p.idx()]
    }

    #[inline]
    pub fn face_is_boundary(&self, f: FaceId) -> bool {
        self.face_bnd[f.idx()]
    }

    pub fn face_attr(&self, f: FaceId) -> &A::Face {
        &self.face_attrs[f.idx()]
    }

    pub fn face_attr_mut(&mut self, f: FaceId) -> &mut A::Face {
        &mut self.face_attrs[f.idx()]
    }

    pub fn num_boundary_faces(&self) -> usize {
        self.face_bnd.iter().filter(|b| **b).count()
    }

    /// Face with the same vertex set as `ring`, in any order or rotation.
    pub fn face_id(&self, ring: &[VertId]) -> Option<FaceId> {
        let first = *ring.first()?;
        self.v2f
            .get(first.idx())?
            .iter()
            .copied()
            .find(|f| same_vertex_set(&self.faces[f.idx()], ring))
    }

    /// Whether `v` is on the ring of `f`.
    #[inline]
    pub fn face_contains_vert(&self, f: FaceId, v: VertId) -> bool {
        self.faces[f.idx()].contains(&v)
    }

    #[inline]
    pub fn face_contains_edge(&self, f: FaceId, e: EdgeId) -> bool {
        self.f2e[f.idx()].contains(&e)
    }

    /// Cached triangulation of face `f`.
    pub fn face_tessellation(&self, f: FaceId) -> &Tessellation {
        &self.face_tess[f.idx()]
    }

    /// Unit normal of face `f` following its stored ring.
    pub fn face_normal(&self, f: FaceId) -> [f64; 3] {
        self.face_normals[f.idx()]
    }

    /// Area of face `f`, summed over its triangulation.
    pub fn face_area(&self, f: FaceId) -> f64 {
        let v = &self.core.verts;
        self.face_tess[f.idx()]
            .iter()
            .map(|[a, b, c]| triangle_area(v[a.idx()], v[b.idx()], v[c.idx()]))
            .sum()
    }

    /// Mean of the face's vertex positions.
    pub fn face_centroid(&self, f: FaceId) -> [f64; 3] {
        centroid(self.faces[f.idx()].iter().map(|v| self.core.verts[v.idx()]))
    }

    // ---- poly / face relations ----------------------------------------

    #[inline]
    pub fn poly_contains_face(&self, p: PolyId, f: FaceId) -> bool {
        self.p2f[p.idx()].contains(&f)
    }

    /// Winding of face `f` in poly `p`, or `None` when `p` does not use `f`.
    pub fn poly_face_winding(&self, p: PolyId, f: FaceId) -> Option<bool> {
        let k = self.p2f[p.idx()].iter().position(|&g| g == f)?;
        Some(self.winding[p.idx()][k])
    }

    /// Faces of `p` with their winding flags.
    pub fn poly_oriented_faces(&self, p: PolyId) -> impl Iterator<Item = (FaceId, bool)> + '_ {
        self.p2f[p.idx()]
            .iter()
            .copied()
            .zip(self.winding[p.idx()].iter().copied())
    }

    /// Normal of face `f` pointing out of poly `p`.
    pub fn poly_face_normal(&self, p: PolyId, f: FaceId) -> Option<[f64; 3]> {
        let n = self.face_normals[f.idx()];
        self.poly_face_winding(p, f)
            .map(|outward| if outward { n } else { [-n[0], -n[1], -n[2]] })
    }

    /// Triangles of face `f` as positions, oriented out of poly `p`.
    /// Empty when `p` does not use `f`.
    pub fn poly_face_triangles(
        &self,
        p: PolyId,
        f: FaceId,
    ) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        let outward = self.poly_face_winding(p, f);
        let v = &self.core.verts;
        self.face_tess[f.idx()]
            .iter()
            .filter(move |_| outward.is_some())
            .map(move |[a, b, c]| {
                if outward == Some(true) {
                    [v[a.idx()], v[b.idx()], v[c.idx()]]
                } else {
                    [v[a.idx()], v[c.idx()], v[b.idx()]]
                }
            })
    }

    /// A face shared by `p` and `q`, if any.
    pub fn poly_shared_face(&self, p: PolyId, q: PolyId) -> Option<FaceId> {
        self.p2f[p.idx()]
            .iter()
            .copied()
            .find(|f| self.p2f[q.idx()].contains(f))
    }

    /// The poly on the other side of face `f`, seen from `p`.
    pub fn poly_adj_through_face(&self, p: PolyId, f: FaceId) -> Option<PolyId> {
        if !self.poly_contains_face(p, f) {
            return None;
        }
        self.f2p[f.idx()].iter().copied().find(|&q| q != p)
    }

    /// Whether `p` has a face on the boundary.
    pub fn poly_is_on_surf(&self, p: PolyId) -> bool {
        self.p2f[p.idx()].iter().any(|f| self.face_bnd[f.idx()])
    }

    /// Boundary faces of `p`.
    pub fn poly_boundary_faces(&self, p: PolyId) -> Vec<FaceId> {
        self.p2f[p.idx()]
            .iter()
            .copied()
            .filter(|f| self.face_bnd[f.idx()])
            .collect()
    }

    pub fn poly_shape(&self, p: PolyId) -> PolyShape {
        PolyShape::from_face_sizes(self.p2f[p.idx()].iter().map(|f| self.faces[f.idx()].len()))
    }

    // ---- measures ------------------------------------------------------

    /// Volume of poly `p`, computed by the element kind.
    pub fn poly_volume(&self, p: PolyId) -> f64 {
        K::poly_volume(self, p)
    }

    /// Sum of all poly volumes.
    pub fn mesh_volume(&self) -> f64 {
        (0..self.num_polys()).map(|i| self.poly_volume(PolyId::new(i))).sum()
    }

    /// Area of the boundary surface.
    pub fn mesh_area(&self) -> f64 {
        (0..self.num_faces())
            .map(FaceId::new)
            .filter(|&f| self.face_bnd[f.idx()] && !self.f2p[f.idx()].is_empty())
            .map(|f| self.face_area(f))
            .sum()
    }

    /// `V - E + F - P`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_verts() as i64 - self.num_edges() as i64 + self.num_faces() as i64
            - self.num_polys() as i64
    }

    // ---- export --------------------------------------------------------

    pub fn vector_faces(&self) -> Vec<Vec<VertId>> {
        self.faces.clone()
    }

    /// Face lists of every poly.
    pub fn vector_polys(&self) -> Vec<Vec<FaceId>> {
        self.p2f.clone()
    }

    pub fn vector_winding(&self) -> Vec<Vec<bool>> {
        self.winding.clone()
    }
}

impl<K, A> VolumeMesh<K, A>
where
    K: VolumeKind,
    A: AttributeSchema,
    A::Poly: Labeled,
{
    /// Polys whose attribute label is `label`.
    pub fn polys_with_label(&self, label: i32) -> Vec<PolyId> {
        ids_with_label(&self.core.poly_attrs, label)
            .into_iter()
            .map(PolyId::new)
            .collect()
    }

    /// Distinct poly labels in ascending order.
    pub fn poly_labels(&self) -> Vec<i32> {
        distinct_labels(&self.core.poly_attrs)
    }
}
