//! One-shot adjacency construction from raw connectivity.
//!
//! Both builders make a single pass over the element rings, collecting edges
//! in a hash map keyed by the canonical (sorted) vertex pair. Edge ids are
//! assigned in first-seen order, so the same input always yields the same
//! ids. Every other relation is then derived from the incidence lists
//! gathered during that pass; nothing is quadratic in the mesh size.
//!
//! Input is fully validated before any table is returned, so a failed build
//! never produces partially-initialized adjacency.

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::core::{check_id, push_unique, ring_pairs, same_vertex_set, validate_ring};
use crate::topology::ids::{EdgeId, EntityKind, FaceId, PolyId, VertId, canonical_pair};

/// Edge list with its vertex adjacency, keyed by canonical vertex pair.
pub(crate) struct EdgeTable {
    pub edges: Vec<[VertId; 2]>,
    pub v2v: Vec<Vec<VertId>>,
    pub v2e: Vec<Vec<EdgeId>>,
    lookup: HashMap<(VertId, VertId), EdgeId>,
}

impl EdgeTable {
    pub fn new(num_verts: usize) -> Self {
        Self {
            edges: Vec::new(),
            v2v: vec![Vec::new(); num_verts],
            v2e: vec![Vec::new(); num_verts],
            lookup: HashMap::new(),
        }
    }

    /// Id of the edge `(a, b)`, creating it on first sight.
    pub fn get_or_insert(&mut self, a: VertId, b: VertId) -> EdgeId {
        let key = canonical_pair(a, b);
        if let Some(&e) = self.lookup.get(&key) {
            return e;
        }
        let e = EdgeId::new(self.edges.len());
        self.lookup.insert(key, e);
        self.edges.push([key.0, key.1]);
        self.v2e[a.idx()].push(e);
        self.v2e[b.idx()].push(e);
        self.v2v[a.idx()].push(b);
        self.v2v[b.idx()].push(a);
        e
    }
}

/// Derived tables of a polygon mesh.
pub(crate) struct SurfaceTables {
    pub edges: Vec<[VertId; 2]>,
    pub v2v: Vec<Vec<VertId>>,
    pub v2e: Vec<Vec<EdgeId>>,
    pub v2p: Vec<Vec<PolyId>>,
    pub e2p: Vec<Vec<PolyId>>,
    pub p2e: Vec<Vec<EdgeId>>,
    pub p2p: Vec<Vec<PolyId>>,
    pub vert_bnd: Vec<bool>,
    pub edge_bnd: Vec<bool>,
}

/// Builds every adjacency relation of a polygon mesh.
///
/// Fails when a ring is invalid, two polys have the same vertex set, or an
/// edge would be shared by more than two polys.
pub(crate) fn build_surface(
    num_verts: usize,
    polys: &[Vec<VertId>],
) -> Result<SurfaceTables, MeshError> {
    let mut v2p: Vec<Vec<PolyId>> = vec![Vec::new(); num_verts];
    for (i, ring) in polys.iter().enumerate() {
        validate_ring(ring, num_verts)?;
        let dup = v2p[ring[0].idx()]
            .iter()
            .any(|q: &PolyId| same_vertex_set(&polys[q.idx()], ring));
        if dup {
            return Err(MeshError::DuplicatePoly(i));
        }
        let p = PolyId::new(i);
        for &v in ring {
            v2p[v.idx()].push(p);
        }
    }

    let mut et = EdgeTable::new(num_verts);
    let mut e2p: Vec<Vec<PolyId>> = Vec::new();
    let mut p2e: Vec<Vec<EdgeId>> = Vec::with_capacity(polys.len());
    for (i, ring) in polys.iter().enumerate() {
        let p = PolyId::new(i);
        let mut row = Vec::with_capacity(ring.len());
        for (a, b) in ring_pairs(ring) {
            let e = et.get_or_insert(a, b);
            if e.idx() == e2p.len() {
                e2p.push(Vec::new());
            }
            let incident = &mut e2p[e.idx()];
            incident.push(p);
            if incident.len() > 2 {
                return Err(MeshError::NonManifold {
                    kind: EntityKind::Edge,
                    id: e.idx(),
                    incident: incident.len(),
                });
            }
            row.push(e);
        }
        p2e.push(row);
    }

    let mut p2p: Vec<Vec<PolyId>> = vec![Vec::new(); polys.len()];
    for incident in &e2p {
        if let [p, q] = incident[..] {
            push_unique(&mut p2p[p.idx()], q);
            push_unique(&mut p2p[q.idx()], p);
        }
    }

    let edge_bnd: Vec<bool> = e2p.iter().map(|ps| ps.len() < 2).collect();
    let vert_bnd: Vec<bool> = et
        .v2e
        .iter()
        .map(|es| es.iter().any(|e| edge_bnd[e.idx()]))
        .collect();

    log::debug!(
        "built surface adjacency: {} verts, {} edges, {} polys",
        num_verts,
        et.edges.len(),
        polys.len()
    );

    let EdgeTable { edges, v2v, v2e, .. } = et;
    Ok(SurfaceTables {
        edges,
        v2v,
        v2e,
        v2p,
        e2p,
        p2e,
        p2p,
        vert_bnd,
        edge_bnd,
    })
}

/// Derived tables of a polyhedral mesh.
pub(crate) struct VolumeTables {
    pub edges: Vec<[VertId; 2]>,
    pub v2v: Vec<Vec<VertId>>,
    pub v2e: Vec<Vec<EdgeId>>,
    pub v2f: Vec<Vec<FaceId>>,
    pub v2p: Vec<Vec<PolyId>>,
    pub e2f: Vec<Vec<FaceId>>,
    pub e2p: Vec<Vec<PolyId>>,
    pub f2e: Vec<Vec<EdgeId>>,
    pub f2f: Vec<Vec<FaceId>>,
    pub f2p: Vec<Vec<PolyId>>,
    pub p2v: Vec<Vec<VertId>>,
    pub p2e: Vec<Vec<EdgeId>>,
    pub p2p: Vec<Vec<PolyId>>,
    pub vert_bnd: Vec<bool>,
    pub edge_bnd: Vec<bool>,
    pub face_bnd: Vec<bool>,
}

/// Checks the poly -> face lists and their winding flags.
pub(crate) fn validate_poly_faces(
    flist: &[FaceId],
    wlist: &[bool],
    num_faces: usize,
) -> Result<(), MeshError> {
    if flist.is_empty() {
        return Err(MeshError::EmptyPoly);
    }
    if flist.len() != wlist.len() {
        return Err(MeshError::WindingMismatch {
            faces: flist.len(),
            windings: wlist.len(),
        });
    }
    for (i, &f) in flist.iter().enumerate() {
        check_id(f, num_faces)?;
        if flist[..i].contains(&f) {
            return Err(MeshError::RepeatedFace(f));
        }
    }
    Ok(())
}

/// Whether two face lists hold the same set of faces.
pub(crate) fn same_face_set(x: &[FaceId], y: &[FaceId]) -> bool {
    x.len() == y.len() && x.iter().all(|f| y.contains(f))
}

/// Builds every adjacency relation of a polyhedral mesh.
///
/// Fails on invalid rings or face lists, duplicate faces or polys, and on
/// any face referenced by more than two polys.
pub(crate) fn build_volume(
    num_verts: usize,
    faces: &[Vec<VertId>],
    polys: &[Vec<FaceId>],
    winding: &[Vec<bool>],
) -> Result<VolumeTables, MeshError> {
    if polys.len() != winding.len() {
        return Err(MeshError::WindingMismatch {
            faces: polys.len(),
            windings: winding.len(),
        });
    }

    let mut v2f: Vec<Vec<FaceId>> = vec![Vec::new(); num_verts];
    for (i, ring) in faces.iter().enumerate() {
        validate_ring(ring, num_verts)?;
        if let Some(&g) = v2f[ring[0].idx()]
            .iter()
            .find(|g: &&FaceId| same_vertex_set(&faces[g.idx()], ring))
        {
            return Err(MeshError::DuplicateFace(g));
        }
        let f = FaceId::new(i);
        for &v in ring {
            v2f[v.idx()].push(f);
        }
    }

    let mut f2p: Vec<Vec<PolyId>> = vec![Vec::new(); faces.len()];
    for (i, (flist, wlist)) in polys.iter().zip(winding).enumerate() {
        validate_poly_faces(flist, wlist, faces.len())?;
        let dup = f2p[flist[0].idx()]
            .iter()
            .any(|q: &PolyId| same_face_set(&polys[q.idx()], flist));
        if dup {
            return Err(MeshError::DuplicatePoly(i));
        }
        let p = PolyId::new(i);
        for &f in flist {
            let incident = &mut f2p[f.idx()];
            incident.push(p);
            if incident.len() > 2 {
                return Err(MeshError::NonManifold {
                    kind: EntityKind::Face,
                    id: f.idx(),
                    incident: incident.len(),
                });
            }
        }
    }

    let mut et = EdgeTable::new(num_verts);
    let mut e2f: Vec<Vec<FaceId>> = Vec::new();
    let mut f2e: Vec<Vec<EdgeId>> = Vec::with_capacity(faces.len());
    for (i, ring) in faces.iter().enumerate() {
        let f = FaceId::new(i);
        let mut row = Vec::with_capacity(ring.len());
        for (a, b) in ring_pairs(ring) {
            let e = et.get_or_insert(a, b);
            if e.idx() == e2f.len() {
                e2f.push(Vec::new());
            }
            e2f[e.idx()].push(f);
            row.push(e);
        }
        f2e.push(row);
    }

    let mut f2f: Vec<Vec<FaceId>> = vec![Vec::new(); faces.len()];
    for incident in &e2f {
        for (k, &f) in incident.iter().enumerate() {
            for &g in &incident[k + 1..] {
                push_unique(&mut f2f[f.idx()], g);
                push_unique(&mut f2f[g.idx()], f);
            }
        }
    }

    let mut p2v: Vec<Vec<VertId>> = Vec::with_capacity(polys.len());
    let mut p2e: Vec<Vec<EdgeId>> = Vec::with_capacity(polys.len());
    let mut v2p: Vec<Vec<PolyId>> = vec![Vec::new(); num_verts];
    let mut e2p: Vec<Vec<PolyId>> = vec![Vec::new(); et.edges.len()];
    for (i, flist) in polys.iter().enumerate() {
        let p = PolyId::new(i);
        let mut vrow = Vec::new();
        let mut erow = Vec::new();
        for &f in flist {
            for &v in &faces[f.idx()] {
                if push_unique(&mut vrow, v) {
                    v2p[v.idx()].push(p);
                }
            }
            for &e in &f2e[f.idx()] {
                if push_unique(&mut erow, e) {
                    e2p[e.idx()].push(p);
                }
            }
        }
        p2v.push(vrow);
        p2e.push(erow);
    }

    let mut p2p: Vec<Vec<PolyId>> = vec![Vec::new(); polys.len()];
    for incident in &f2p {
        if let [p, q] = incident[..] {
            push_unique(&mut p2p[p.idx()], q);
            push_unique(&mut p2p[q.idx()], p);
        }
    }

    let face_bnd: Vec<bool> = f2p.iter().map(|ps| ps.len() < 2).collect();
    let edge_bnd: Vec<bool> = e2f
        .iter()
        .map(|fs| fs.iter().any(|f| face_bnd[f.idx()]))
        .collect();
    let vert_bnd: Vec<bool> = v2f
        .iter()
        .map(|fs| fs.iter().any(|f| face_bnd[f.idx()]))
        .collect();

    log::debug!(
        "built volume adjacency: {} verts, {} edges, {} faces, {} polys",
        num_verts,
        et.edges.len(),
        faces.len(),
        polys.len()
    );

    let EdgeTable { edges, v2v, v2e, .. } = et;
    Ok(VolumeTables {
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
    })
}

/// Interior faces whose two polys list them with the same winding, i.e.
/// whose orientation is inconsistent between the two sides.
pub(crate) fn faces_with_equal_winding(
    polys: &[Vec<FaceId>],
    winding: &[Vec<bool>],
    f2p: &[Vec<PolyId>],
) -> Vec<FaceId> {
    let winding_of = |p: PolyId, f: FaceId| {
        polys[p.idx()]
            .iter()
            .position(|&g| g == f)
            .map(|k| winding[p.idx()][k])
    };
    f2p.iter()
        .enumerate()
        .filter_map(|(i, ps)| {
            let f = FaceId::new(i);
            match ps[..] {
                [p, q] if winding_of(p, f) == winding_of(q, f) => Some(f),
                _ => None,
            }
        })
        .collect()
}
