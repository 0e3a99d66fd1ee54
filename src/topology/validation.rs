//! Full consistency checks of the adjacency tables.
//!
//! [`DebugInvariants::validate_invariants`] walks every table of a mesh and
//! reports the first inconsistency as [`MeshError::InvariantBroken`]. It is
//! O(mesh size) and meant for tests, debugging and the `check-invariants`
//! feature, which runs it after every mutation.
//!
//! Checked, for both tiers:
//! - every parallel array has the length of its entity array;
//! - every id stored in a row is in range, and no row repeats an id;
//! - every relation agrees with its inverse;
//! - no two edges join the same vertex pair, and no edge is a loop;
//! - derived rows (edges of a ring, polys sharing an edge or face, ...)
//!   match what the primary connectivity implies;
//! - no face (volume) or edge (surface) has more than two polys;
//! - boundary flags match the current incidence counts;
//! - every cached tessellation has `n - 2` triangles over the ring's vertices.

use hashbrown::HashSet;

use crate::debug_invariants::DebugInvariants;
use crate::geometry::tessellate::Tessellation;
use crate::mesh_error::MeshError;
use crate::topology::attributes::AttributeSchema;
use crate::topology::core::{MeshCore, ring_pairs};
use crate::topology::ids::{DenseId, EdgeId, FaceId, PolyId, VertId, canonical_pair};
use crate::topology::surface::SurfaceMesh;
use crate::topology::volume::{VolumeKind, VolumeMesh};

fn check_len(what: &str, actual: usize, expected: usize) -> Result<(), MeshError> {
    if actual == expected {
        Ok(())
    } else {
        Err(MeshError::broken(format!(
            "{what} has {actual} entries, expected {expected}"
        )))
    }
}

/// Every id in range, no id twice in one row.
fn check_rows<T: DenseId>(what: &str, rows: &[Vec<T>], len: usize) -> Result<(), MeshError> {
    for (i, row) in rows.iter().enumerate() {
        for (k, t) in row.iter().enumerate() {
            if t.index() >= len {
                return Err(MeshError::broken(format!(
                    "{what}[{i}] holds {} {} out of range ({len})",
                    T::KIND,
                    t.index()
                )));
            }
            if row[..k].contains(t) {
                return Err(MeshError::broken(format!(
                    "{what}[{i}] repeats {} {}",
                    T::KIND,
                    t.index()
                )));
            }
        }
    }
    Ok(())
}

/// `t ∈ fwd[r]` implies `r ∈ back[t]`.
fn check_inverse<R: DenseId, T: DenseId>(
    what: &str,
    fwd: &[Vec<T>],
    back: &[Vec<R>],
) -> Result<(), MeshError> {
    for (i, row) in fwd.iter().enumerate() {
        let r = R::from_index(i);
        for t in row {
            if !back[t.index()].contains(&r) {
                return Err(MeshError::broken(format!(
                    "{what}: {} {i} lists {} {} but not the other way round",
                    R::KIND,
                    T::KIND,
                    t.index()
                )));
            }
        }
    }
    Ok(())
}

fn check_both_ways<R: DenseId, T: DenseId>(
    what: &str,
    fwd: &[Vec<T>],
    back: &[Vec<R>],
) -> Result<(), MeshError> {
    check_inverse(what, fwd, back)?;
    check_inverse(what, back, fwd)
}

fn same_set<T: Ord + Copy>(x: &[T], y: &[T]) -> bool {
    let mut x = x.to_vec();
    let mut y = y.to_vec();
    x.sort_unstable();
    y.sort_unstable();
    x == y
}

fn check_same_set<T: DenseId>(what: &str, i: usize, stored: &[T], expected: &[T]) -> Result<(), MeshError> {
    if same_set(stored, expected) {
        Ok(())
    } else {
        Err(MeshError::broken(format!(
            "{what}[{i}] is {stored:?}, expected {expected:?}"
        )))
    }
}

fn check_flag(what: &str, i: usize, stored: bool, expected: bool) -> Result<(), MeshError> {
    if stored == expected {
        Ok(())
    } else {
        Err(MeshError::broken(format!(
            "{what}[{i}] is {stored}, incidence says {expected}"
        )))
    }
}

/// Everything but what depends on the face layer or boundary rule.
fn validate_core<A: AttributeSchema>(core: &MeshCore<A>) -> Result<(), MeshError> {
    let (nv, ne, np) = (core.num_verts(), core.num_edges(), core.num_polys());
    check_len("v2v", core.v2v.len(), nv)?;
    check_len("v2e", core.v2e.len(), nv)?;
    check_len("v2p", core.v2p.len(), nv)?;
    check_len("vert_bnd", core.vert_bnd.len(), nv)?;
    check_len("vert_attrs", core.vert_attrs.len(), nv)?;
    check_len("e2p", core.e2p.len(), ne)?;
    check_len("edge_bnd", core.edge_bnd.len(), ne)?;
    check_len("edge_attrs", core.edge_attrs.len(), ne)?;
    check_len("p2e", core.p2e.len(), np)?;
    check_len("p2p", core.p2p.len(), np)?;
    check_len("poly_attrs", core.poly_attrs.len(), np)?;

    check_rows("v2v", &core.v2v, nv)?;
    check_rows("v2e", &core.v2e, ne)?;
    check_rows("v2p", &core.v2p, np)?;
    check_rows("e2p", &core.e2p, np)?;
    check_rows("p2v", &core.p2v, nv)?;
    check_rows("p2e", &core.p2e, ne)?;
    check_rows("p2p", &core.p2p, np)?;

    let mut seen = HashSet::with_capacity(ne);
    for (i, &[a, b]) in core.edges.iter().enumerate() {
        if a.idx() >= nv || b.idx() >= nv {
            return Err(MeshError::broken(format!("edge {i} has a dangling endpoint")));
        }
        if a == b {
            return Err(MeshError::broken(format!("edge {i} is a loop on vertex {a}")));
        }
        if !seen.insert(canonical_pair(a, b)) {
            return Err(MeshError::broken(format!("edge {i} duplicates ({a}, {b})")));
        }
        let e = EdgeId::new(i);
        if !core.v2e[a.idx()].contains(&e) || !core.v2e[b.idx()].contains(&e) {
            return Err(MeshError::broken(format!("edge {i} missing from v2e of its endpoints")));
        }
    }
    for (i, row) in core.v2e.iter().enumerate() {
        let v = VertId::new(i);
        let mut others = Vec::with_capacity(row.len());
        for &e in row {
            match core.edge_other_end(e, v) {
                Some(w) => others.push(w),
                None => {
                    return Err(MeshError::broken(format!(
                        "v2e[{i}] lists edge {e}, which does not touch it"
                    )));
                }
            }
        }
        check_same_set("v2v", i, &core.v2v[i], &others)?;
    }

    check_both_ways("v2p/p2v", &core.v2p, &core.p2v)?;
    check_both_ways("e2p/p2e", &core.e2p, &core.p2e)?;
    check_inverse("p2p", &core.p2p, &core.p2p)?;
    Ok(())
}

fn check_tessellation(what: &str, i: usize, ring: &[VertId], tess: &Tessellation) -> Result<(), MeshError> {
    if tess.num_triangles() + 2 != ring.len() || tess.triangles.len() % 3 != 0 {
        return Err(MeshError::broken(format!(
            "{what}[{i}] has {} triangles for a ring of {}",
            tess.num_triangles(),
            ring.len()
        )));
    }
    if let Some(v) = tess.triangles.iter().find(|v| !ring.contains(*v)) {
        return Err(MeshError::broken(format!(
            "{what}[{i}] uses vertex {v}, which is not on the ring"
        )));
    }
    Ok(())
}

/// Edges along a closed ring, looked up in `core`.
fn ring_edges<A: AttributeSchema>(
    core: &MeshCore<A>,
    ring: &[VertId],
    what: &str,
    i: usize,
) -> Result<Vec<EdgeId>, MeshError> {
    ring_pairs(ring)
        .map(|(a, b)| {
            core.find_edge(a, b).ok_or_else(|| {
                MeshError::broken(format!("{what}[{i}]: no edge for ring pair ({a}, {b})"))
            })
        })
        .collect()
}

/// Ids other than `me` that share an entry of `row` through `back`.
fn neighbours_through<R: DenseId, T: DenseId>(row: &[T], back: &[Vec<R>], me: R) -> Vec<R> {
    let mut out = Vec::new();
    for t in row {
        for &r in &back[t.index()] {
            if r != me && !out.contains(&r) {
                out.push(r);
            }
        }
    }
    out
}

impl<A: AttributeSchema> DebugInvariants for SurfaceMesh<A> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SurfaceMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let core = &self.core;
        validate_core(core)?;
        let np = core.num_polys();
        check_len("poly_tess", self.poly_tess.len(), np)?;
        check_len("poly_normals", self.poly_normals.len(), np)?;

        for (i, ring) in core.p2v.iter().enumerate() {
            if ring.len() < 3 {
                return Err(MeshError::broken(format!("poly {i} has a ring of {}", ring.len())));
            }
            let edges = ring_edges(core, ring, "p2v", i)?;
            check_same_set("p2e", i, &core.p2e[i], &edges)?;
            let p = PolyId::new(i);
            let nbrs = neighbours_through(&core.p2e[i], &core.e2p, p);
            check_same_set("p2p", i, &core.p2p[i], &nbrs)?;
            check_tessellation("poly_tess", i, ring, &self.poly_tess[i])?;
        }

        for (i, polys) in core.e2p.iter().enumerate() {
            if polys.len() > 2 {
                return Err(MeshError::broken(format!(
                    "edge {i} has {} incident polys",
                    polys.len()
                )));
            }
            check_flag("edge_bnd", i, core.edge_bnd[i], polys.len() < 2)?;
        }
        for (i, edges) in core.v2e.iter().enumerate() {
            let expected = edges.iter().any(|e| core.edge_bnd[e.idx()]);
            check_flag("vert_bnd", i, core.vert_bnd[i], expected)?;
        }
        Ok(())
    }
}

impl<K: VolumeKind, A: AttributeSchema> DebugInvariants for VolumeMesh<K, A> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "VolumeMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let core = &self.core;
        validate_core(core)?;
        let (nv, ne, nf, np) = (core.num_verts(), core.num_edges(), self.faces.len(), core.num_polys());
        check_len("v2f", self.v2f.len(), nv)?;
        check_len("e2f", self.e2f.len(), ne)?;
        check_len("f2e", self.f2e.len(), nf)?;
        check_len("f2f", self.f2f.len(), nf)?;
        check_len("f2p", self.f2p.len(), nf)?;
        check_len("face_bnd", self.face_bnd.len(), nf)?;
        check_len("face_tess", self.face_tess.len(), nf)?;
        check_len("face_normals", self.face_normals.len(), nf)?;
        check_len("face_attrs", self.face_attrs.len(), nf)?;
        check_len("p2f", self.p2f.len(), np)?;
        check_len("winding", self.winding.len(), np)?;

        check_rows("faces", &self.faces, nv)?;
        check_rows("v2f", &self.v2f, nf)?;
        check_rows("e2f", &self.e2f, nf)?;
        check_rows("f2e", &self.f2e, ne)?;
        check_rows("f2f", &self.f2f, nf)?;
        check_rows("f2p", &self.f2p, np)?;
        check_rows("p2f", &self.p2f, nf)?;

        check_both_ways("v2f/faces", &self.v2f, &self.faces)?;
        check_both_ways("e2f/f2e", &self.e2f, &self.f2e)?;
        check_both_ways("f2p/p2f", &self.f2p, &self.p2f)?;
        check_inverse("f2f", &self.f2f, &self.f2f)?;

        let mut keys: HashSet<Vec<VertId>> = HashSet::with_capacity(nf);
        for (i, ring) in self.faces.iter().enumerate() {
            if ring.len() < 3 {
                return Err(MeshError::broken(format!("face {i} has a ring of {}", ring.len())));
            }
            let mut key = ring.clone();
            key.sort_unstable();
            if !keys.insert(key) {
                return Err(MeshError::broken(format!("face {i} duplicates another face")));
            }
            let edges = ring_edges(core, ring, "faces", i)?;
            check_same_set("f2e", i, &self.f2e[i], &edges)?;
            let nbrs = neighbours_through(&self.f2e[i], &self.e2f, FaceId::new(i));
            check_same_set("f2f", i, &self.f2f[i], &nbrs)?;
            check_tessellation("face_tess", i, ring, &self.face_tess[i])?;
        }

        for (i, flist) in self.p2f.iter().enumerate() {
            if flist.is_empty() {
                return Err(MeshError::broken(format!("poly {i} has no faces")));
            }
            check_len("winding row", self.winding[i].len(), flist.len())?;
            let mut verts = Vec::new();
            let mut edges = Vec::new();
            for f in flist {
                for &v in &self.faces[f.idx()] {
                    if !verts.contains(&v) {
                        verts.push(v);
                    }
                }
                for &e in &self.f2e[f.idx()] {
                    if !edges.contains(&e) {
                        edges.push(e);
                    }
                }
            }
            check_same_set("p2v", i, &core.p2v[i], &verts)?;
            check_same_set("p2e", i, &core.p2e[i], &edges)?;
            let nbrs = neighbours_through(flist, &self.f2p, PolyId::new(i));
            check_same_set("p2p", i, &core.p2p[i], &nbrs)?;
        }

        for (i, polys) in self.f2p.iter().enumerate() {
            if polys.len() > 2 {
                return Err(MeshError::broken(format!(
                    "face {i} has {} incident polys",
                    polys.len()
                )));
            }
            check_flag("face_bnd", i, self.face_bnd[i], polys.len() < 2)?;
        }
        for (i, faces) in self.e2f.iter().enumerate() {
            let expected = faces.iter().any(|f| self.face_bnd[f.idx()]);
            check_flag("edge_bnd", i, core.edge_bnd[i], expected)?;
        }
        for (i, faces) in self.v2f.iter().enumerate() {
            let expected = faces.iter().any(|f| self.face_bnd[f.idx()]);
            check_flag("vert_bnd", i, core.vert_bnd[i], expected)?;
        }
        Ok(())
    }
}
