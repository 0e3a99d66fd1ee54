//! Incremental mutation of polyhedral meshes.

use crate::mesh_error::MeshError;
use crate::topology::attributes::AttributeSchema;
use crate::topology::builder::{same_face_set, validate_poly_faces};
use crate::topology::core::{
    check_id, merged, push_unique, remap_list, remap_rows, remap_self_relation, remove_value, ring_pairs,
    validate_ring,
};
use crate::topology::edit::{TopologyEdit, removal_order, swap_to_last};
use crate::topology::ids::{EdgeId, EntityKind, FaceId, PolyId, VertId, canonical_pair};
use crate::topology::volume::{VolumeKind, VolumeMesh};

impl<K: VolumeKind, A: AttributeSchema> VolumeMesh<K, A> {
    #[inline]
    fn after_edit(&self) {
        #[cfg(feature = "check-invariants")]
        crate::debug_invariants::DebugInvariants::debug_assert_invariants(self);
    }

    /// Appends an isolated vertex.
    pub fn add_vertex(&mut self, pos: [f64; 3]) -> VertId {
        let v = self.core.push_vert(pos);
        self.v2f.push(Vec::new());
        self.after_edit();
        v
    }

    /// Adds the edge `(a, b)`. An edge without faces is interior.
    pub fn add_edge(&mut self, a: VertId, b: VertId) -> Result<EdgeId, MeshError> {
        self.core.check_vert(a)?;
        self.core.check_vert(b)?;
        if a == b {
            return Err(MeshError::DegenerateEdge(a));
        }
        if self.core.find_edge(a, b).is_some() {
            return Err(MeshError::DuplicateEdge(a, b));
        }
        let e = self.new_edge(a, b);
        self.after_edit();
        Ok(e)
    }

    pub(super) fn new_edge(&mut self, a: VertId, b: VertId) -> EdgeId {
        let (lo, hi) = canonical_pair(a, b);
        let e = self.core.push_edge(lo, hi, false);
        self.e2f.push(Vec::new());
        e
    }

    /// Adds a face with the given vertex ring, creating missing edges.
    ///
    /// The face has no poly yet, so it is boundary until two polys use it.
    pub fn add_face(&mut self, ring: Vec<VertId>) -> Result<FaceId, MeshError> {
        validate_ring(&ring, self.core.num_verts())?;
        if let Some(g) = self.face_id(&ring) {
            return Err(MeshError::DuplicateFace(g));
        }

        let f = FaceId::new(self.faces.len());
        for &v in &ring {
            self.v2f[v.idx()].push(f);
        }
        let mut f2e = Vec::with_capacity(ring.len());
        let mut f2f = Vec::new();
        for (a, b) in ring_pairs(&ring) {
            let e = match self.core.find_edge(a, b) {
                Some(e) => e,
                None => self.new_edge(a, b),
            };
            for &g in &self.e2f[e.idx()] {
                push_unique(&mut f2f, g);
            }
            self.e2f[e.idx()].push(f);
            f2e.push(e);
        }
        for &g in &f2f {
            self.f2f[g.idx()].push(f);
        }
        self.faces.push(ring);
        self.f2e.push(f2e);
        self.f2f.push(f2f);
        self.f2p.push(Vec::new());
        self.face_bnd.push(true);
        self.face_attrs.push(A::Face::default());

        let (tess, normal) = self.face_geometry(f)?;
        self.face_tess.push(tess);
        self.face_normals.push(normal);
        self.refresh_boundary_around(&[f]);
        self.after_edit();
        Ok(f)
    }

    /// Adds a poly bounded by `faces`, with one winding flag per face.
    ///
    /// Rejected, with the mesh untouched, when the lists are invalid, a
    /// poly with the same faces exists, or one of the faces already has two
    /// polys.
    pub fn add_poly(&mut self, faces: Vec<FaceId>, winding: Vec<bool>) -> Result<PolyId, MeshError> {
        validate_poly_faces(&faces, &winding, self.faces.len())?;
        if let Some(&q) = self.f2p[faces[0].idx()]
            .iter()
            .find(|q| same_face_set(&self.p2f[q.idx()], &faces))
        {
            return Err(MeshError::DuplicatePoly(q.idx()));
        }
        for &f in &faces {
            let incident = self.f2p[f.idx()].len();
            if incident >= 2 {
                return Err(MeshError::NonManifold {
                    kind: EntityKind::Face,
                    id: f.idx(),
                    incident: incident + 1,
                });
            }
        }

        let p = self.core.push_poly();
        let mut p2v = Vec::new();
        let mut p2e = Vec::new();
        for (&f, &w) in faces.iter().zip(&winding) {
            for i in 0..self.f2p[f.idx()].len() {
                let q = self.f2p[f.idx()][i];
                push_unique(&mut self.core.p2p[p.idx()], q);
                push_unique(&mut self.core.p2p[q.idx()], p);
                if self.options.check_winding && self.poly_face_winding(q, f) == Some(w) {
                    log::warn!("face {f} has the same winding in polys {q} and {p}");
                }
            }
            self.f2p[f.idx()].push(p);
            for &v in &self.faces[f.idx()] {
                if push_unique(&mut p2v, v) {
                    self.core.v2p[v.idx()].push(p);
                }
            }
            for &e in &self.f2e[f.idx()] {
                if push_unique(&mut p2e, e) {
                    self.core.e2p[e.idx()].push(p);
                }
            }
        }
        self.core.p2v[p.idx()] = p2v;
        self.core.p2e[p.idx()] = p2e;
        self.refresh_boundary_around(&faces);
        self.p2f.push(faces);
        self.winding.push(winding);
        self.after_edit();
        Ok(p)
    }

    /// Removes poly `p` together with the faces, edges and vertices that no
    /// longer belong to anything afterwards.
    pub fn remove_poly(&mut self, p: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(p)?;
        self.remove_and_purge(vec![p], Vec::new(), Vec::new(), Vec::new())
    }

    /// Removes face `f`, the polys using it, and whatever becomes dangling.
    pub fn remove_face(&mut self, f: FaceId) -> Result<(), MeshError> {
        check_id(f, self.faces.len())?;
        let polys = self.f2p[f.idx()].clone();
        self.remove_and_purge(polys, vec![f], Vec::new(), Vec::new())
    }

    /// Removes edge `e`, the faces and polys using it, and whatever becomes
    /// dangling.
    pub fn remove_edge(&mut self, e: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(e)?;
        let polys = self.core.e2p[e.idx()].clone();
        let faces = self.e2f[e.idx()].clone();
        let verts = self.core.edges[e.idx()].to_vec();
        self.remove_and_purge(polys, faces, vec![e], verts)
    }

    /// Removes vertex `v`, everything incident to it, and whatever becomes
    /// dangling.
    pub fn remove_vert(&mut self, v: VertId) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        let polys = self.core.v2p[v.idx()].clone();
        let faces = self.v2f[v.idx()].clone();
        let edges = self.core.v2e[v.idx()].clone();
        self.remove_and_purge(polys, faces, edges, vec![v])
    }

    /// Removes `polys`, then every candidate face, edge and vertex left
    /// without incidences. Candidates are the entities of the removed polys
    /// and of the candidate faces, plus the extras given.
    fn remove_and_purge(
        &mut self,
        polys: Vec<PolyId>,
        mut faces: Vec<FaceId>,
        mut edges: Vec<EdgeId>,
        mut verts: Vec<VertId>,
    ) -> Result<(), MeshError> {
        for &p in &polys {
            faces.extend_from_slice(&self.p2f[p.idx()]);
        }
        for &f in &faces {
            edges.extend_from_slice(&self.f2e[f.idx()]);
            verts.extend_from_slice(&self.faces[f.idx()]);
        }
        for p in removal_order(polys) {
            self.remove_unreferenced(p)?;
        }
        let dangling: Vec<FaceId> = faces
            .into_iter()
            .filter(|f| self.f2p[f.idx()].is_empty())
            .collect();
        for f in removal_order(dangling) {
            self.remove_unreferenced(f)?;
        }
        let dangling: Vec<EdgeId> = edges
            .into_iter()
            .filter(|e| self.e2f[e.idx()].is_empty() && self.core.e2p[e.idx()].is_empty())
            .collect();
        for e in removal_order(dangling) {
            self.remove_unreferenced(e)?;
        }
        let dangling: Vec<VertId> = verts
            .into_iter()
            .filter(|v| {
                self.core.v2e[v.idx()].is_empty()
                    && self.v2f[v.idx()].is_empty()
                    && self.core.v2p[v.idx()].is_empty()
            })
            .collect();
        for v in removal_order(dangling) {
            self.remove_unreferenced(v)?;
        }
        Ok(())
    }
}

impl<K: VolumeKind, A: AttributeSchema> TopologyEdit<VertId> for VolumeMesh<K, A> {
    fn switch_id(&mut self, a: VertId, b: VertId) -> Result<(), MeshError> {
        self.core.check_vert(a)?;
        self.core.check_vert(b)?;
        if a == b {
            return Ok(());
        }
        let faces = merged(&self.v2f[a.idx()], &self.v2f[b.idx()]);
        self.core.switch_vert_rows(a, b);
        self.v2f.swap(a.idx(), b.idx());
        remap_rows(&mut self.faces, &faces, a, b);
        for f in faces {
            remap_list(&mut self.face_tess[f.idx()].triangles, a, b);
        }
        Ok(())
    }

    fn remove_unreferenced(&mut self, v: VertId) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        let refs = self.core.v2e[v.idx()].len()
            + self.v2f[v.idx()].len()
            + self.core.v2p[v.idx()].len();
        if refs > 0 {
            return Err(MeshError::StillReferenced {
                kind: EntityKind::Vertex,
                id: v.idx(),
                refs,
            });
        }
        swap_to_last(v, self.core.num_verts(), |x, y| self.switch_id(x, y))?;
        self.core.pop_vert();
        self.v2f.pop();
        self.after_edit();
        Ok(())
    }
}

impl<K: VolumeKind, A: AttributeSchema> TopologyEdit<EdgeId> for VolumeMesh<K, A> {
    fn switch_id(&mut self, a: EdgeId, b: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(a)?;
        self.core.check_edge(b)?;
        if a == b {
            return Ok(());
        }
        let faces = merged(&self.e2f[a.idx()], &self.e2f[b.idx()]);
        self.core.switch_edge_rows(a, b);
        self.e2f.swap(a.idx(), b.idx());
        remap_rows(&mut self.f2e, &faces, a, b);
        Ok(())
    }

    fn remove_unreferenced(&mut self, e: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(e)?;
        let refs = self.e2f[e.idx()].len() + self.core.e2p[e.idx()].len();
        if refs > 0 {
            return Err(MeshError::StillReferenced {
                kind: EntityKind::Edge,
                id: e.idx(),
                refs,
            });
        }
        self.core.unlink_edge(e);
        swap_to_last(e, self.core.num_edges(), |x, y| self.switch_id(x, y))?;
        self.core.pop_edge();
        self.e2f.pop();
        self.after_edit();
        Ok(())
    }
}

impl<K: VolumeKind, A: AttributeSchema> TopologyEdit<FaceId> for VolumeMesh<K, A> {
    fn switch_id(&mut self, a: FaceId, b: FaceId) -> Result<(), MeshError> {
        let n = self.faces.len();
        check_id(a, n)?;
        check_id(b, n)?;
        if a == b {
            return Ok(());
        }
        let verts = merged(&self.faces[a.idx()], &self.faces[b.idx()]);
        let edges = merged(&self.f2e[a.idx()], &self.f2e[b.idx()]);
        let polys = merged(&self.f2p[a.idx()], &self.f2p[b.idx()]);
        let nbrs = merged(&self.f2f[a.idx()], &self.f2f[b.idx()]);

        let (i, j) = (a.idx(), b.idx());
        self.faces.swap(i, j);
        self.f2e.swap(i, j);
        self.f2f.swap(i, j);
        self.f2p.swap(i, j);
        self.face_bnd.swap(i, j);
        self.face_tess.swap(i, j);
        self.face_normals.swap(i, j);
        self.face_attrs.swap(i, j);

        remap_rows(&mut self.v2f, &verts, a, b);
        remap_rows(&mut self.e2f, &edges, a, b);
        remap_rows(&mut self.p2f, &polys, a, b);
        remap_self_relation(&mut self.f2f, &nbrs, a, b);
        Ok(())
    }

    fn remove_unreferenced(&mut self, f: FaceId) -> Result<(), MeshError> {
        check_id(f, self.faces.len())?;
        let refs = self.f2p[f.idx()].len();
        if refs > 0 {
            return Err(MeshError::StillReferenced {
                kind: EntityKind::Face,
                id: f.idx(),
                refs,
            });
        }
        let ring = self.faces[f.idx()].clone();
        let edges = std::mem::take(&mut self.f2e[f.idx()]);
        for &v in &ring {
            remove_value(&mut self.v2f[v.idx()], &f);
        }
        for &e in &edges {
            remove_value(&mut self.e2f[e.idx()], &f);
        }
        for g in std::mem::take(&mut self.f2f[f.idx()]) {
            remove_value(&mut self.f2f[g.idx()], &f);
        }
        for &e in &edges {
            self.refresh_edge_boundary(e);
        }
        for &v in &ring {
            self.refresh_vert_boundary(v);
        }

        swap_to_last(f, self.faces.len(), |x, y| self.switch_id(x, y))?;
        self.faces.pop();
        self.f2e.pop();
        self.f2f.pop();
        self.f2p.pop();
        self.face_bnd.pop();
        self.face_tess.pop();
        self.face_normals.pop();
        self.face_attrs.pop();
        self.after_edit();
        Ok(())
    }
}

impl<K: VolumeKind, A: AttributeSchema> TopologyEdit<PolyId> for VolumeMesh<K, A> {
    fn switch_id(&mut self, a: PolyId, b: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(a)?;
        self.core.check_poly(b)?;
        if a == b {
            return Ok(());
        }
        let faces = merged(&self.p2f[a.idx()], &self.p2f[b.idx()]);
        self.core.switch_poly_rows(a, b);
        self.p2f.swap(a.idx(), b.idx());
        self.winding.swap(a.idx(), b.idx());
        remap_rows(&mut self.f2p, &faces, a, b);
        Ok(())
    }

    /// Detaches poly `p` from its faces, edges, vertices and neighbours,
    /// then removes it. Its faces are kept even when they end up unused.
    fn remove_unreferenced(&mut self, p: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(p)?;
        self.core.unlink_poly(p);
        let faces = std::mem::take(&mut self.p2f[p.idx()]);
        self.winding[p.idx()].clear();
        for &f in &faces {
            remove_value(&mut self.f2p[f.idx()], &p);
        }
        self.refresh_boundary_around(&faces);

        swap_to_last(p, self.core.num_polys(), |x, y| self.switch_id(x, y))?;
        self.core.pop_poly();
        self.p2f.pop();
        self.winding.pop();
        self.after_edit();
        Ok(())
    }
}
