//! Incremental mutation of polygon meshes.

use crate::mesh_error::MeshError;
use crate::topology::attributes::AttributeSchema;
use crate::topology::core::{push_unique, remap_list, ring_pairs, same_vertex_set, validate_ring};
use crate::topology::edit::{TopologyEdit, removal_order, swap_to_last};
use crate::topology::ids::{EdgeId, EntityKind, PolyId, VertId, canonical_pair};
use crate::topology::surface::SurfaceMesh;

impl<A: AttributeSchema> SurfaceMesh<A> {
    #[inline]
    fn after_edit(&self) {
        #[cfg(feature = "check-invariants")]
        crate::debug_invariants::DebugInvariants::debug_assert_invariants(self);
    }

    /// Appends an isolated vertex.
    pub fn add_vertex(&mut self, pos: [f64; 3]) -> VertId {
        let v = self.core.push_vert(pos);
        self.after_edit();
        v
    }

    /// Adds the edge `(a, b)`. A new edge has no polygons, so it and both
    /// endpoints are boundary.
    pub fn add_edge(&mut self, a: VertId, b: VertId) -> Result<EdgeId, MeshError> {
        self.core.check_vert(a)?;
        self.core.check_vert(b)?;
        if a == b {
            return Err(MeshError::DegenerateEdge(a));
        }
        if self.core.find_edge(a, b).is_some() {
            return Err(MeshError::DuplicateEdge(a, b));
        }
        let (lo, hi) = canonical_pair(a, b);
        let e = self.core.push_edge(lo, hi, true);
        self.core.vert_bnd[a.idx()] = true;
        self.core.vert_bnd[b.idx()] = true;
        self.after_edit();
        Ok(e)
    }

    /// Adds a polygon with the given vertex ring, creating missing edges.
    ///
    /// Rejected, with the mesh untouched, when the ring is invalid, a
    /// polygon with the same vertices exists, or one of its edges already
    /// has two polygons.
    pub fn add_poly(&mut self, ring: Vec<VertId>) -> Result<PolyId, MeshError> {
        validate_ring(&ring, self.core.num_verts())?;
        if let Some(&q) = self.core.v2p[ring[0].idx()]
            .iter()
            .find(|q| same_vertex_set(&self.core.p2v[q.idx()], &ring))
        {
            return Err(MeshError::DuplicatePoly(q.idx()));
        }
        for (a, b) in ring_pairs(&ring) {
            if let Some(e) = self.core.find_edge(a, b) {
                let incident = self.core.e2p[e.idx()].len();
                if incident >= 2 {
                    return Err(MeshError::NonManifold {
                        kind: EntityKind::Edge,
                        id: e.idx(),
                        incident: incident + 1,
                    });
                }
            }
        }

        let p = self.core.push_poly();
        for &v in &ring {
            self.core.v2p[v.idx()].push(p);
        }
        let mut p2e = Vec::with_capacity(ring.len());
        for (a, b) in ring_pairs(&ring) {
            let e = match self.core.find_edge(a, b) {
                Some(e) => e,
                None => {
                    let (lo, hi) = canonical_pair(a, b);
                    self.core.push_edge(lo, hi, true)
                }
            };
            for i in 0..self.core.e2p[e.idx()].len() {
                let q = self.core.e2p[e.idx()][i];
                push_unique(&mut self.core.p2p[p.idx()], q);
                push_unique(&mut self.core.p2p[q.idx()], p);
            }
            self.core.e2p[e.idx()].push(p);
            p2e.push(e);
        }
        for &e in &p2e {
            self.refresh_edge_boundary(e);
        }
        for &v in &ring {
            self.refresh_vert_boundary(v);
        }
        self.core.p2e[p.idx()] = p2e;
        self.core.p2v[p.idx()] = ring;

        let (tess, normal) = self.poly_geometry(p)?;
        self.poly_tess.push(tess);
        self.poly_normals.push(normal);
        self.after_edit();
        Ok(p)
    }

    /// Removes polygon `p` together with the edges and vertices that no
    /// longer belong to anything afterwards.
    pub fn remove_poly(&mut self, p: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(p)?;
        self.remove_and_purge(vec![p], Vec::new(), Vec::new())
    }

    /// Removes edge `e`, every polygon using it, and whatever becomes
    /// dangling.
    pub fn remove_edge(&mut self, e: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(e)?;
        let polys = self.core.e2p[e.idx()].clone();
        let verts = self.core.edges[e.idx()].to_vec();
        self.remove_and_purge(polys, vec![e], verts)
    }

    /// Removes vertex `v`, every edge and polygon incident to it, and
    /// whatever becomes dangling.
    pub fn remove_vert(&mut self, v: VertId) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        let polys = self.core.v2p[v.idx()].clone();
        let edges = self.core.v2e[v.idx()].clone();
        self.remove_and_purge(polys, edges, vec![v])
    }

    /// Removes `polys`, then every candidate edge and vertex left without
    /// incidences. Candidates are the entities of the removed polys plus
    /// the extras given.
    fn remove_and_purge(
        &mut self,
        polys: Vec<PolyId>,
        mut edges: Vec<EdgeId>,
        mut verts: Vec<VertId>,
    ) -> Result<(), MeshError> {
        for &p in &polys {
            edges.extend_from_slice(&self.core.p2e[p.idx()]);
            verts.extend_from_slice(&self.core.p2v[p.idx()]);
        }
        for p in removal_order(polys) {
            self.remove_unreferenced(p)?;
        }
        let dangling: Vec<EdgeId> = edges
            .into_iter()
            .filter(|e| self.core.e2p[e.idx()].is_empty())
            .collect();
        for e in removal_order(dangling) {
            self.remove_unreferenced(e)?;
        }
        let dangling: Vec<VertId> = verts
            .into_iter()
            .filter(|v| self.core.v2e[v.idx()].is_empty() && self.core.v2p[v.idx()].is_empty())
            .collect();
        for v in removal_order(dangling) {
            self.remove_unreferenced(v)?;
        }
        Ok(())
    }
}

impl<A: AttributeSchema> TopologyEdit<VertId> for SurfaceMesh<A> {
    fn switch_id(&mut self, a: VertId, b: VertId) -> Result<(), MeshError> {
        self.core.check_vert(a)?;
        self.core.check_vert(b)?;
        if a == b {
            return Ok(());
        }
        self.core.switch_vert_rows(a, b);
        let mut polys = self.core.v2p[a.idx()].clone();
        polys.extend_from_slice(&self.core.v2p[b.idx()]);
        polys.sort_unstable();
        polys.dedup();
        for p in polys {
            remap_list(&mut self.poly_tess[p.idx()].triangles, a, b);
        }
        Ok(())
    }

    fn remove_unreferenced(&mut self, v: VertId) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        let refs = self.core.v2e[v.idx()].len() + self.core.v2p[v.idx()].len();
        if refs > 0 {
            return Err(MeshError::StillReferenced {
                kind: EntityKind::Vertex,
                id: v.idx(),
                refs,
            });
        }
        swap_to_last(v, self.core.num_verts(), |a, b| self.switch_id(a, b))?;
        self.core.pop_vert();
        self.after_edit();
        Ok(())
    }
}

impl<A: AttributeSchema> TopologyEdit<EdgeId> for SurfaceMesh<A> {
    fn switch_id(&mut self, a: EdgeId, b: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(a)?;
        self.core.check_edge(b)?;
        if a != b {
            self.core.switch_edge_rows(a, b);
        }
        Ok(())
    }

    fn remove_unreferenced(&mut self, e: EdgeId) -> Result<(), MeshError> {
        self.core.check_edge(e)?;
        let refs = self.core.e2p[e.idx()].len();
        if refs > 0 {
            return Err(MeshError::StillReferenced {
                kind: EntityKind::Edge,
                id: e.idx(),
                refs,
            });
        }
        let [a, b] = self.core.edges[e.idx()];
        self.core.unlink_edge(e);
        self.refresh_vert_boundary(a);
        self.refresh_vert_boundary(b);
        swap_to_last(e, self.core.num_edges(), |x, y| self.switch_id(x, y))?;
        self.core.pop_edge();
        self.after_edit();
        Ok(())
    }
}

impl<A: AttributeSchema> TopologyEdit<PolyId> for SurfaceMesh<A> {
    fn switch_id(&mut self, a: PolyId, b: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(a)?;
        self.core.check_poly(b)?;
        if a != b {
            self.core.switch_poly_rows(a, b);
            self.poly_tess.swap(a.idx(), b.idx());
            self.poly_normals.swap(a.idx(), b.idx());
        }
        Ok(())
    }

    /// Detaches polygon `p` from its edges, vertices and neighbours, then
    /// removes it. Edges and vertices are kept even when they end up unused.
    fn remove_unreferenced(&mut self, p: PolyId) -> Result<(), MeshError> {
        self.core.check_poly(p)?;
        let edges = self.core.p2e[p.idx()].clone();
        self.core.unlink_poly(p);
        for &e in &edges {
            self.refresh_edge_boundary(e);
        }
        for &e in &edges {
            let [a, b] = self.core.edges[e.idx()];
            self.refresh_vert_boundary(a);
            self.refresh_vert_boundary(b);
        }
        swap_to_last(p, self.core.num_polys(), |x, y| self.switch_id(x, y))?;
        self.core.pop_poly();
        self.poly_tess.pop();
        self.poly_normals.pop();
        self.after_edit();
        Ok(())
    }
}
