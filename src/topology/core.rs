//! Tables shared by both mesh tiers: vertices, edges, and the vertex / edge /
//! poly adjacency that exists whether or not there is a face layer.
//!
//! All relations are stored as one `Vec` row per entity. Rows are kept free
//! of duplicates, and every relation is mirrored by its inverse
//! (`v2e` ↔ `edges`, `v2p` ↔ `p2v`, `e2p` ↔ `p2e`, `v2v` and `p2p` are
//! self-symmetric). The helpers here never validate; callers check
//! preconditions first.

use itertools::Itertools;

use crate::geometry::bbox::BoundingBox;
use crate::mesh_error::MeshError;
use crate::topology::attributes::AttributeSchema;
use crate::topology::ids::{DenseId, EdgeId, PolyId, VertId};

#[derive(Clone, Debug, Default)]
pub(crate) struct MeshCore<A: AttributeSchema> {
    pub verts: Vec<[f64; 3]>,
    pub edges: Vec<[VertId; 2]>,
    pub v2v: Vec<Vec<VertId>>,
    pub v2e: Vec<Vec<EdgeId>>,
    pub v2p: Vec<Vec<PolyId>>,
    pub e2p: Vec<Vec<PolyId>>,
    pub p2v: Vec<Vec<VertId>>,
    pub p2e: Vec<Vec<EdgeId>>,
    pub p2p: Vec<Vec<PolyId>>,
    pub vert_bnd: Vec<bool>,
    pub edge_bnd: Vec<bool>,
    pub vert_attrs: Vec<A::Vert>,
    pub edge_attrs: Vec<A::Edge>,
    pub poly_attrs: Vec<A::Poly>,
    pub bbox: BoundingBox,
}

impl<A: AttributeSchema> MeshCore<A> {
    #[inline]
    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn num_polys(&self) -> usize {
        self.p2v.len()
    }

    #[inline]
    pub fn check_vert(&self, v: VertId) -> Result<(), MeshError> {
        check_id(v, self.num_verts())
    }

    #[inline]
    pub fn check_edge(&self, e: EdgeId) -> Result<(), MeshError> {
        check_id(e, self.num_edges())
    }

    #[inline]
    pub fn check_poly(&self, p: PolyId) -> Result<(), MeshError> {
        check_id(p, self.num_polys())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Appends a vertex with empty adjacency rows.
    pub fn push_vert(&mut self, pos: [f64; 3]) -> VertId {
        let v = VertId::new(self.verts.len());
        self.verts.push(pos);
        self.v2v.push(Vec::new());
        self.v2e.push(Vec::new());
        self.v2p.push(Vec::new());
        self.vert_bnd.push(false);
        self.vert_attrs.push(A::Vert::default());
        self.bbox.extend(pos);
        v
    }

    /// Edge joining `a` and `b`, found by scanning the incident edges of `a`.
    pub fn find_edge(&self, a: VertId, b: VertId) -> Option<EdgeId> {
        self.v2e[a.idx()]
            .iter()
            .copied()
            .find(|&e| self.edge_other_end(e, a) == Some(b))
    }

    #[inline]
    pub fn edge_other_end(&self, e: EdgeId, v: VertId) -> Option<VertId> {
        let [a, b] = self.edges[e.idx()];
        if a == v {
            Some(b)
        } else if b == v {
            Some(a)
        } else {
            None
        }
    }

    /// Appends the edge `(a, b)` and links both endpoints. No duplicate check.
    pub fn push_edge(&mut self, a: VertId, b: VertId, boundary: bool) -> EdgeId {
        let e = EdgeId::new(self.edges.len());
        self.edges.push([a, b]);
        self.e2p.push(Vec::new());
        self.edge_bnd.push(boundary);
        self.edge_attrs.push(A::Edge::default());
        self.v2e[a.idx()].push(e);
        self.v2e[b.idx()].push(e);
        self.v2v[a.idx()].push(b);
        self.v2v[b.idx()].push(a);
        e
    }

    /// Removes `e` from the rows of its endpoints. The edge row itself stays.
    pub fn unlink_edge(&mut self, e: EdgeId) {
        let [a, b] = self.edges[e.idx()];
        remove_value(&mut self.v2e[a.idx()], &e);
        remove_value(&mut self.v2e[b.idx()], &e);
        remove_value(&mut self.v2v[a.idx()], &b);
        remove_value(&mut self.v2v[b.idx()], &a);
    }

    /// Appends an empty poly row.
    pub fn push_poly(&mut self) -> PolyId {
        let p = PolyId::new(self.p2v.len());
        self.p2v.push(Vec::new());
        self.p2e.push(Vec::new());
        self.p2p.push(Vec::new());
        self.poly_attrs.push(A::Poly::default());
        p
    }

    /// Removes every back-reference to `p` held by vertices, edges and other polys,
    /// and empties the rows of `p`. Returns the former `p2p` row.
    pub fn unlink_poly(&mut self, p: PolyId) -> Vec<PolyId> {
        for v in std::mem::take(&mut self.p2v[p.idx()]) {
            remove_value(&mut self.v2p[v.idx()], &p);
        }
        for e in std::mem::take(&mut self.p2e[p.idx()]) {
            remove_value(&mut self.e2p[e.idx()], &p);
        }
        let nbrs = std::mem::take(&mut self.p2p[p.idx()]);
        for &q in &nbrs {
            remove_value(&mut self.p2p[q.idx()], &p);
        }
        nbrs
    }

    /// Exchanges vertices `a` and `b` in every core table. Only the rows of the
    /// neighbours of `a` and `b` are visited.
    pub fn switch_vert_rows(&mut self, a: VertId, b: VertId) {
        let edges = merged(&self.v2e[a.idx()], &self.v2e[b.idx()]);
        let polys = merged(&self.v2p[a.idx()], &self.v2p[b.idx()]);
        let nbrs = merged(&self.v2v[a.idx()], &self.v2v[b.idx()]);

        let (i, j) = (a.idx(), b.idx());
        self.verts.swap(i, j);
        self.v2v.swap(i, j);
        self.v2e.swap(i, j);
        self.v2p.swap(i, j);
        self.vert_bnd.swap(i, j);
        self.vert_attrs.swap(i, j);

        for e in edges {
            remap_list(&mut self.edges[e.idx()], a, b);
        }
        remap_rows(&mut self.p2v, &polys, a, b);
        remap_self_relation(&mut self.v2v, &nbrs, a, b);
    }

    /// Exchanges edges `a` and `b` in every core table.
    pub fn switch_edge_rows(&mut self, a: EdgeId, b: EdgeId) {
        let verts = merged(&self.edges[a.idx()], &self.edges[b.idx()]);
        let polys = merged(&self.e2p[a.idx()], &self.e2p[b.idx()]);

        let (i, j) = (a.idx(), b.idx());
        self.edges.swap(i, j);
        self.e2p.swap(i, j);
        self.edge_bnd.swap(i, j);
        self.edge_attrs.swap(i, j);

        remap_rows(&mut self.v2e, &verts, a, b);
        remap_rows(&mut self.p2e, &polys, a, b);
    }

    /// Exchanges polys `a` and `b` in every core table.
    pub fn switch_poly_rows(&mut self, a: PolyId, b: PolyId) {
        let verts = merged(&self.p2v[a.idx()], &self.p2v[b.idx()]);
        let edges = merged(&self.p2e[a.idx()], &self.p2e[b.idx()]);
        let nbrs = merged(&self.p2p[a.idx()], &self.p2p[b.idx()]);

        let (i, j) = (a.idx(), b.idx());
        self.p2v.swap(i, j);
        self.p2e.swap(i, j);
        self.p2p.swap(i, j);
        self.poly_attrs.swap(i, j);

        remap_rows(&mut self.v2p, &verts, a, b);
        remap_rows(&mut self.e2p, &edges, a, b);
        remap_self_relation(&mut self.p2p, &nbrs, a, b);
    }

    /// Drops the last vertex. Its rows must already be empty.
    pub fn pop_vert(&mut self) {
        self.verts.pop();
        self.v2v.pop();
        self.v2e.pop();
        self.v2p.pop();
        self.vert_bnd.pop();
        self.vert_attrs.pop();
    }

    /// Drops the last edge. It must already be unlinked.
    pub fn pop_edge(&mut self) {
        self.edges.pop();
        self.e2p.pop();
        self.edge_bnd.pop();
        self.edge_attrs.pop();
    }

    /// Drops the last poly. It must already be unlinked.
    pub fn pop_poly(&mut self) {
        self.p2v.pop();
        self.p2e.pop();
        self.p2p.pop();
        self.poly_attrs.pop();
    }
}

#[inline]
pub(crate) fn check_id<I: DenseId>(id: I, len: usize) -> Result<(), MeshError> {
    if id.index() < len {
        Ok(())
    } else {
        Err(MeshError::out_of_range(I::KIND, id.index(), len))
    }
}

/// The involution exchanging `a` and `b` and fixing everything else.
#[inline]
pub(crate) fn swap_remap<T: Copy + Eq>(x: T, a: T, b: T) -> T {
    if x == a {
        b
    } else if x == b {
        a
    } else {
        x
    }
}

#[inline]
pub(crate) fn remap_list<T: Copy + Eq>(list: &mut [T], a: T, b: T) {
    for x in list {
        *x = swap_remap(*x, a, b);
    }
}

/// Applies the `a <-> b` exchange to the listed rows of a relation whose rows
/// are indexed by a different kind than `a` and `b`.
pub(crate) fn remap_rows<R: DenseId, T: Copy + Eq>(
    table: &mut [Vec<T>],
    rows: &[R],
    a: T,
    b: T,
) {
    for r in rows {
        remap_list(&mut table[r.index()], a, b);
    }
}

/// Same as [`remap_rows`] for a relation from a kind to itself (`v2v`, `f2f`,
/// `p2p`). `nbrs` are the neighbours of `a` and `b` taken *before* their rows
/// were swapped, so each row position is remapped too.
pub(crate) fn remap_self_relation<T: DenseId>(table: &mut [Vec<T>], nbrs: &[T], a: T, b: T) {
    for &n in nbrs {
        remap_list(&mut table[swap_remap(n, a, b).index()], a, b);
    }
}

/// Sorted, deduplicated union of two rows.
pub(crate) fn merged<T: Copy + Ord>(x: &[T], y: &[T]) -> Vec<T> {
    x.iter().chain(y).copied().sorted_unstable().dedup().collect()
}

/// Pushes `x` unless already present. Returns whether it was pushed.
#[inline]
pub(crate) fn push_unique<T: PartialEq>(list: &mut Vec<T>, x: T) -> bool {
    if list.contains(&x) {
        false
    } else {
        list.push(x);
        true
    }
}

/// Removes every occurrence of `x`, keeping the order of the rest.
#[inline]
pub(crate) fn remove_value<T: PartialEq>(list: &mut Vec<T>, x: &T) -> bool {
    let before = list.len();
    list.retain(|y| y != x);
    list.len() != before
}

/// Checks that `ring` is a usable vertex ring over `num_verts` vertices.
pub(crate) fn validate_ring(ring: &[VertId], num_verts: usize) -> Result<(), MeshError> {
    if ring.len() < 3 {
        return Err(MeshError::RingTooShort(ring.len()));
    }
    for (i, &v) in ring.iter().enumerate() {
        check_id(v, num_verts)?;
        if ring[..i].contains(&v) {
            return Err(MeshError::RepeatedVertex(v));
        }
    }
    Ok(())
}

/// Consecutive vertex pairs of a closed ring, last to first included.
#[inline]
pub(crate) fn ring_pairs(ring: &[VertId]) -> impl Iterator<Item = (VertId, VertId)> + '_ {
    ring.iter().copied().circular_tuple_windows()
}

/// Whether two rings hold the same vertex set.
pub(crate) fn same_vertex_set(x: &[VertId], y: &[VertId]) -> bool {
    x.len() == y.len() && x.iter().all(|v| y.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::attributes::StdAttributes;

    fn v(i: usize) -> VertId {
        VertId::new(i)
    }

    #[test]
    fn remap_is_an_involution() {
        let mut list = vec![v(0), v(3), v(5), v(3)];
        remap_list(&mut list, v(3), v(5));
        assert_eq!(list, vec![v(0), v(5), v(3), v(5)]);
        remap_list(&mut list, v(3), v(5));
        assert_eq!(list, vec![v(0), v(3), v(5), v(3)]);
    }

    #[test]
    fn merged_rows_are_sorted_and_unique() {
        assert_eq!(merged(&[v(4), v(1)], &[v(1), v(3)]), vec![v(1), v(3), v(4)]);
        assert!(merged::<VertId>(&[], &[]).is_empty());
    }

    #[test]
    fn ring_pairs_close_the_ring() {
        let ring = [v(1), v(2), v(3)];
        let pairs: Vec<_> = ring_pairs(&ring).collect();
        assert_eq!(pairs, vec![(v(1), v(2)), (v(2), v(3)), (v(3), v(1))]);
    }

    #[test]
    fn validate_ring_rejects_bad_input() {
        assert_eq!(validate_ring(&[v(0), v(1)], 4), Err(MeshError::RingTooShort(2)));
        assert_eq!(
            validate_ring(&[v(0), v(1), v(0)], 4),
            Err(MeshError::RepeatedVertex(v(0)))
        );
        assert!(matches!(
            validate_ring(&[v(0), v(1), v(9)], 4),
            Err(MeshError::IdOutOfRange { id: 9, len: 4, .. })
        ));
        assert!(validate_ring(&[v(0), v(1), v(2)], 4).is_ok());
    }

    #[test]
    fn switch_adjacent_vertices() {
        let mut core = MeshCore::<StdAttributes>::default();
        for i in 0..3 {
            core.push_vert([i as f64, 0.0, 0.0]);
        }
        core.push_edge(v(0), v(1), false);
        core.push_edge(v(1), v(2), false);
        core.switch_vert_rows(v(0), v(1));
        assert_eq!(core.verts[0], [1.0, 0.0, 0.0]);
        assert_eq!(core.edges[0], [v(1), v(0)]);
        assert_eq!(core.edges[1], [v(0), v(2)]);
        assert_eq!(core.v2v[0], vec![v(1), v(2)]);
        assert_eq!(core.v2v[1], vec![v(0)]);
        assert_eq!(core.v2v[2], vec![v(0)]);
        assert_eq!(core.find_edge(v(2), v(0)), Some(EdgeId::new(1)));
    }
}
