//! Read-only adjacency queries shared by both mesh tiers.
//!
//! [`MeshTopology`] exposes the tables every mesh has (vertices, edges, polys
//! and their mutual adjacency). The face layer of polyhedral meshes is
//! queried through inherent methods on [`VolumeMesh`](crate::topology::volume::VolumeMesh).
//!
//! Accessors taking an id index straight into the tables and panic on an id
//! that is out of range, the same way slice indexing does. Use
//! `num_verts` / `num_edges` / `num_polys` to bound loops.

use crate::geometry::bbox::BoundingBox;
use crate::geometry::metrics::{centroid, distance};
use crate::topology::attributes::AttributeSchema;
use crate::topology::ids::{EdgeId, PolyId, VertId};

/// Adjacency and attribute access common to surface and volume meshes.
pub trait MeshTopology {
    /// Attribute blocks carried by the mesh.
    type Attr: AttributeSchema;

    fn num_verts(&self) -> usize;
    fn num_edges(&self) -> usize;
    fn num_polys(&self) -> usize;

    /// All vertex positions, indexed by [`VertId`].
    fn verts(&self) -> &[[f64; 3]];

    /// All edges as vertex pairs, indexed by [`EdgeId`].
    fn edges(&self) -> &[[VertId; 2]];

    /// Bounding box of the vertices. It only grows under mutation; call
    /// `update_bbox` on the mesh for a tight box.
    fn bbox(&self) -> &BoundingBox;

    fn adj_v2v(&self, v: VertId) -> &[VertId];
    fn adj_v2e(&self, v: VertId) -> &[EdgeId];
    fn adj_v2p(&self, v: VertId) -> &[PolyId];
    fn adj_e2p(&self, e: EdgeId) -> &[PolyId];
    fn adj_p2v(&self, p: PolyId) -> &[VertId];
    fn adj_p2e(&self, p: PolyId) -> &[EdgeId];
    fn adj_p2p(&self, p: PolyId) -> &[PolyId];

    fn vert_is_boundary(&self, v: VertId) -> bool;
    fn edge_is_boundary(&self, e: EdgeId) -> bool;

    fn vert_attr(&self, v: VertId) -> &<Self::Attr as AttributeSchema>::Vert;
    fn vert_attr_mut(&mut self, v: VertId) -> &mut <Self::Attr as AttributeSchema>::Vert;
    fn edge_attr(&self, e: EdgeId) -> &<Self::Attr as AttributeSchema>::Edge;
    fn edge_attr_mut(&mut self, e: EdgeId) -> &mut <Self::Attr as AttributeSchema>::Edge;
    fn poly_attr(&self, p: PolyId) -> &<Self::Attr as AttributeSchema>::Poly;
    fn poly_attr_mut(&mut self, p: PolyId) -> &mut <Self::Attr as AttributeSchema>::Poly;

    /// Id of the edge joining `a` and `b`, if any. Order does not matter.
    fn edge_id(&self, a: VertId, b: VertId) -> Option<EdgeId>;

    #[inline]
    fn vert(&self, v: VertId) -> [f64; 3] {
        self.verts()[v.idx()]
    }

    #[inline]
    fn edge_verts(&self, e: EdgeId) -> [VertId; 2] {
        self.edges()[e.idx()]
    }

    /// Whether `a` and `b` are joined by an edge.
    #[inline]
    fn verts_are_adj(&self, a: VertId, b: VertId) -> bool {
        self.adj_v2v(a).contains(&b)
    }

    /// The endpoint of `e` that is not `v`, or `None` if `v` is not on `e`.
    fn edge_vert_opposite(&self, e: EdgeId, v: VertId) -> Option<VertId> {
        match self.edge_verts(e) {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => None,
        }
    }

    /// Whether `v` is an endpoint of `e`.
    #[inline]
    fn edge_contains_vert(&self, e: EdgeId, v: VertId) -> bool {
        self.edge_verts(e).contains(&v)
    }

    /// Number of edges incident to `v`.
    #[inline]
    fn vert_valence(&self, v: VertId) -> usize {
        self.adj_v2e(v).len()
    }

    fn edge_length(&self, e: EdgeId) -> f64 {
        let [a, b] = self.edge_verts(e);
        distance(self.vert(a), self.vert(b))
    }

    /// Mean edge length, `0.0` for a mesh without edges.
    fn edge_avg_length(&self) -> f64 {
        let n = self.num_edges();
        if n == 0 {
            return 0.0;
        }
        (0..n).map(|i| self.edge_length(EdgeId::new(i))).sum::<f64>() / n as f64
    }

    #[inline]
    fn poly_contains_vert(&self, p: PolyId, v: VertId) -> bool {
        self.adj_p2v(p).contains(&v)
    }

    #[inline]
    fn poly_contains_edge(&self, p: PolyId, e: EdgeId) -> bool {
        self.adj_p2e(p).contains(&e)
    }

    /// Mean of the poly's vertex positions.
    fn poly_centroid(&self, p: PolyId) -> [f64; 3] {
        centroid(self.adj_p2v(p).iter().map(|&v| self.vert(v)))
    }

    /// Polys across edge `e` as seen from `p`.
    fn poly_adj_through_edge(&self, p: PolyId, e: EdgeId) -> Vec<PolyId> {
        self.adj_e2p(e).iter().copied().filter(|&q| q != p).collect()
    }

    /// Copy of every vertex position.
    fn vector_verts(&self) -> Vec<[f64; 3]> {
        self.verts().to_vec()
    }

    fn num_boundary_edges(&self) -> usize {
        (0..self.num_edges())
            .filter(|&i| self.edge_is_boundary(EdgeId::new(i)))
            .count()
    }

    fn num_boundary_verts(&self) -> usize {
        (0..self.num_verts())
            .filter(|&i| self.vert_is_boundary(VertId::new(i)))
            .count()
    }
}

/// Implements [`MeshTopology`] for a mesh type with a `core: MeshCore<A>` field.
/// The call site must have the id types and `AttributeSchema` in scope.
macro_rules! delegate_mesh_topology {
    ([$($gen:tt)*] $ty:ty, $attr:ident) => {
        impl<$($gen)*> $crate::topology::query::MeshTopology for $ty {
            type Attr = $attr;

            #[inline]
            fn num_verts(&self) -> usize {
                self.core.num_verts()
            }
            #[inline]
            fn num_edges(&self) -> usize {
                self.core.num_edges()
            }
            #[inline]
            fn num_polys(&self) -> usize {
                self.core.num_polys()
            }
            #[inline]
            fn verts(&self) -> &[[f64; 3]] {
                &self.core.verts
            }
            #[inline]
            fn edges(&self) -> &[[VertId; 2]] {
                &self.core.edges
            }
            #[inline]
            fn bbox(&self) -> &$crate::geometry::bbox::BoundingBox {
                &self.core.bbox
            }
            #[inline]
            fn adj_v2v(&self, v: VertId) -> &[VertId] {
                &self.core.v2v[v.idx()]
            }
            #[inline]
            fn adj_v2e(&self, v: VertId) -> &[EdgeId] {
                &self.core.v2e[v.idx()]
            }
            #[inline]
            fn adj_v2p(&self, v: VertId) -> &[PolyId] {
                &self.core.v2p[v.idx()]
            }
            #[inline]
            fn adj_e2p(&self, e: EdgeId) -> &[PolyId] {
                &self.core.e2p[e.idx()]
            }
            #[inline]
            fn adj_p2v(&self, p: PolyId) -> &[VertId] {
                &self.core.p2v[p.idx()]
            }
            #[inline]
            fn adj_p2e(&self, p: PolyId) -> &[EdgeId] {
                &self.core.p2e[p.idx()]
            }
            #[inline]
            fn adj_p2p(&self, p: PolyId) -> &[PolyId] {
                &self.core.p2p[p.idx()]
            }
            #[inline]
            fn vert_is_boundary(&self, v: VertId) -> bool {
                self.core.vert_bnd[v.idx()]
            }
            #[inline]
            fn edge_is_boundary(&self, e: EdgeId) -> bool {
                self.core.edge_bnd[e.idx()]
            }
            fn vert_attr(&self, v: VertId) -> &<$attr as AttributeSchema>::Vert {
                &self.core.vert_attrs[v.idx()]
            }
            fn vert_attr_mut(&mut self, v: VertId) -> &mut <$attr as AttributeSchema>::Vert {
                &mut self.core.vert_attrs[v.idx()]
            }
            fn edge_attr(&self, e: EdgeId) -> &<$attr as AttributeSchema>::Edge {
                &self.core.edge_attrs[e.idx()]
            }
            fn edge_attr_mut(&mut self, e: EdgeId) -> &mut <$attr as AttributeSchema>::Edge {
                &mut self.core.edge_attrs[e.idx()]
            }
            fn poly_attr(&self, p: PolyId) -> &<$attr as AttributeSchema>::Poly {
                &self.core.poly_attrs[p.idx()]
            }
            fn poly_attr_mut(&mut self, p: PolyId) -> &mut <$attr as AttributeSchema>::Poly {
                &mut self.core.poly_attrs[p.idx()]
            }
            fn edge_id(&self, a: VertId, b: VertId) -> Option<EdgeId> {
                if a.idx() >= self.core.num_verts() || b.idx() >= self.core.num_verts() {
                    return None;
                }
                self.core.find_edge(a, b)
            }
        }
    };
}

pub(crate) use delegate_mesh_topology;
