mod util;
use polymesh_topology::prelude::*;
use proptest::prelude::*;
use util::*;

/// Every stored row of a surface mesh, for before / after comparisons.
fn surface_rows(m: &SurfaceMesh) -> Vec<String> {
    let mut out = Vec::new();
    for v in (0..m.num_verts()).map(VertId::new) {
        out.push(format!(
            "v{} {:?} {:?} {:?} {:?} {}",
            v,
            m.vert(v),
            m.adj_v2v(v),
            m.adj_v2e(v),
            m.adj_v2p(v),
            m.vert_is_boundary(v)
        ));
    }
    for e in (0..m.num_edges()).map(EdgeId::new) {
        out.push(format!("e{} {:?} {:?} {}", e, m.edge_verts(e), m.adj_e2p(e), m.edge_is_boundary(e)));
    }
    for p in (0..m.num_polys()).map(PolyId::new) {
        out.push(format!(
            "p{} {:?} {:?} {:?} {:?}",
            p,
            m.adj_p2v(p),
            m.adj_p2e(p),
            m.adj_p2p(p),
            m.poly_tessellation(p).triangles
        ));
    }
    out
}

fn volume_rows<K: VolumeKind>(m: &VolumeMesh<K>) -> Vec<String> {
    let mut out = Vec::new();
    for v in (0..m.num_verts()).map(VertId::new) {
        out.push(format!("v{} {:?} {:?} {:?} {:?}", v, m.vert(v), m.adj_v2v(v), m.adj_v2e(v), m.adj_v2f(v)));
    }
    for e in (0..m.num_edges()).map(EdgeId::new) {
        out.push(format!("e{} {:?} {:?} {:?}", e, m.edge_verts(e), m.adj_e2f(e), m.adj_e2p(e)));
    }
    for f in (0..m.num_faces()).map(FaceId::new) {
        out.push(format!(
            "f{} {:?} {:?} {:?} {:?} {}",
            f,
            m.face_verts(f),
            m.adj_f2e(f),
            m.adj_f2f(f),
            m.adj_f2p(f),
            m.face_is_boundary(f)
        ));
    }
    for p in (0..m.num_polys()).map(PolyId::new) {
        out.push(format!("p{} {:?} {:?} {:?}", p, m.adj_p2f(p), m.adj_p2v(p), m.adj_p2p(p)));
    }
    out
}

#[test]
fn referenced_vertex_cannot_be_removed() {
    let mut cube = cube_surface();
    let before = surface_rows(&cube);
    let err = cube.remove_unreferenced(vid(0)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::PreconditionViolation);
    assert!(matches!(
        err,
        MeshError::StillReferenced { kind: EntityKind::Vertex, id: 0, refs: 6 }
    ));
    assert_eq!(surface_rows(&cube), before, "a rejected removal leaves the mesh untouched");

    let mut vol = unit_cube();
    let err = vol.remove_unreferenced(vid(0)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::PreconditionViolation);
    let err = vol.remove_unreferenced(FaceId::new(0)).unwrap_err();
    assert!(matches!(err, MeshError::StillReferenced { kind: EntityKind::Face, .. }));
    let err = vol.remove_unreferenced(EdgeId::new(0)).unwrap_err();
    assert!(matches!(err, MeshError::StillReferenced { kind: EntityKind::Edge, .. }));
}

#[test]
fn out_of_range_ids_are_reported() {
    let mut grid = quad_grid(1);
    let err = grid.remove_poly(PolyId::new(5)).unwrap_err();
    assert_eq!(
        err,
        MeshError::IdOutOfRange { kind: EntityKind::Poly, id: 5, len: 1 }
    );
    assert!(grid.switch_id(vid(0), vid(4)).is_err());
    assert!(grid.add_edge(vid(0), vid(9)).is_err());
}

#[test]
fn isolated_vertex_is_removed_by_swap_and_pop() {
    let mut grid = quad_grid(1);
    let lonely = grid.add_vertex([9.0, 9.0, 9.0]);
    let last = grid.add_vertex([7.0, 7.0, 7.0]);
    assert_eq!((lonely, last), (vid(4), vid(5)));

    grid.remove_unreferenced(lonely).unwrap();
    assert_eq!(grid.num_verts(), 5);
    assert_eq!(grid.vert(lonely), [7.0, 7.0, 7.0], "the last vertex took the freed slot");
    grid.validate_invariants().unwrap();
}

#[test]
fn remove_poly_purges_dangling_entities() {
    let mut grid = quad_grid(2);
    grid.remove_poly(PolyId::new(0)).unwrap();
    grid.validate_invariants().unwrap();
    assert_eq!(grid.num_polys(), 3);
    assert_eq!(grid.num_edges(), 10);
    assert_eq!(grid.num_verts(), 8);
    assert_eq!(grid.num_boundary_edges(), 8);
    assert_eq!(grid.num_boundary_verts(), 8, "the old centre vertex is now on the boundary");
    assert_eq!(grid.euler_characteristic(), 1);
}

#[test]
fn remove_vert_takes_its_star_along() {
    let mut cube = cube_surface();
    cube.remove_vert(vid(0)).unwrap();
    cube.validate_invariants().unwrap();
    assert_eq!(cube.num_verts(), 7);
    assert_eq!(cube.num_edges(), 9);
    assert_eq!(cube.num_polys(), 3);
    assert_eq!(cube.num_boundary_edges(), 6);
    assert_eq!(cube.euler_characteristic(), 1);
}

#[test]
fn remove_edge_takes_both_polys() {
    let mut grid = quad_grid(2);
    let e = grid.edge_id(vid(1), vid(4)).unwrap();
    grid.remove_edge(e).unwrap();
    grid.validate_invariants().unwrap();
    assert_eq!(grid.num_polys(), 2);
    assert_eq!(grid.num_edges(), 7);
    assert_eq!(grid.num_verts(), 6);
    assert_eq!(grid.euler_characteristic(), 1);
}

#[test]
fn detached_poly_leaves_its_edges() {
    let mut grid = quad_grid(1);
    grid.remove_unreferenced(PolyId::new(0)).unwrap();
    grid.validate_invariants().unwrap();
    assert_eq!(grid.num_polys(), 0);
    assert_eq!(grid.num_edges(), 4);
    assert_eq!(grid.num_boundary_verts(), 4);
}

#[test]
fn incremental_surface() {
    let mut m: SurfaceMesh = SurfaceMesh::new();
    for p in box_corners(0.0, 1.0).into_iter().take(4) {
        m.add_vertex(p);
    }
    let a = m.add_poly(vs(&[0, 1, 2])).unwrap();
    let b = m.add_poly(vs(&[0, 2, 3])).unwrap();
    m.validate_invariants().unwrap();
    assert_eq!(m.num_edges(), 5);
    assert_eq!(m.adj_p2p(a), &[b]);
    assert!(!m.edge_is_boundary(m.edge_id(vid(0), vid(2)).unwrap()));

    assert_eq!(m.add_poly(vs(&[2, 1, 0])).unwrap_err(), MeshError::DuplicatePoly(0));
    assert_eq!(m.add_edge(vid(2), vid(0)).unwrap_err(), MeshError::DuplicateEdge(vid(2), vid(0)));
    assert_eq!(m.add_edge(vid(3), vid(3)).unwrap_err(), MeshError::DegenerateEdge(vid(3)));

    let v = m.add_vertex([0.5, 0.5, 1.0]);
    let before = surface_rows(&m);
    let err = m.add_poly(vec![vid(0), vid(2), v]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NonManifoldTopology);
    assert_eq!(surface_rows(&m), before);

    let e = m.add_edge(vid(1), v).unwrap();
    assert!(m.edge_is_boundary(e));
    assert!(m.vert_is_boundary(v));
    m.validate_invariants().unwrap();
}

#[test]
fn switch_id_is_an_involution() {
    let mut cube = cube_surface();
    let before = surface_rows(&cube);

    cube.switch_id(vid(0), vid(6)).unwrap();
    cube.validate_invariants().unwrap();
    assert_eq!(cube.vert(vid(0)), [1.0, 1.0, 1.0]);
    assert_ne!(surface_rows(&cube), before);
    cube.switch_id(vid(0), vid(6)).unwrap();
    assert_eq!(surface_rows(&cube), before);

    cube.switch_id(EdgeId::new(1), EdgeId::new(10)).unwrap();
    cube.validate_invariants().unwrap();
    cube.switch_id(EdgeId::new(1), EdgeId::new(10)).unwrap();
    cube.switch_id(PolyId::new(2), PolyId::new(5)).unwrap();
    cube.validate_invariants().unwrap();
    cube.switch_id(PolyId::new(2), PolyId::new(5)).unwrap();
    assert_eq!(surface_rows(&cube), before);
}

#[test]
fn volume_switch_id_is_an_involution() {
    let mut mesh = two_cubes();
    let before = volume_rows(&mesh);

    mesh.switch_id(vid(1), vid(11)).unwrap();
    mesh.switch_id(FaceId::new(3), FaceId::new(9)).unwrap();
    mesh.switch_id(EdgeId::new(0), EdgeId::new(19)).unwrap();
    mesh.switch_id(PolyId::new(0), PolyId::new(1)).unwrap();
    mesh.validate_invariants().unwrap();
    assert!(approx(mesh.mesh_volume(), 2.0));

    mesh.switch_id(PolyId::new(0), PolyId::new(1)).unwrap();
    mesh.switch_id(EdgeId::new(0), EdgeId::new(19)).unwrap();
    mesh.switch_id(FaceId::new(3), FaceId::new(9)).unwrap();
    mesh.switch_id(vid(1), vid(11)).unwrap();
    assert_eq!(volume_rows(&mesh), before);
}

#[test]
fn removing_one_of_two_cubes_exposes_the_shared_face() {
    let mut mesh = two_cubes();
    let shared = mesh.face_id(&vs(&[1, 2, 5, 6])).unwrap();
    assert!(!mesh.face_is_boundary(shared));

    mesh.remove_poly(PolyId::new(0)).unwrap();
    mesh.validate_invariants().unwrap();
    assert_eq!(mesh.num_polys(), 1);
    assert_eq!(mesh.num_faces(), 6);
    assert_eq!(mesh.num_edges(), 12);
    assert_eq!(mesh.num_verts(), 8);
    assert_eq!(mesh.num_boundary_faces(), 6);
    assert!(approx(mesh.mesh_volume(), 1.0));
    assert!(approx(mesh.mesh_area(), 6.0));
}

#[test]
fn volume_remove_vert_and_face() {
    let mut mesh = two_cubes();
    mesh.remove_vert(vid(8)).unwrap();
    mesh.validate_invariants().unwrap();
    assert_eq!(mesh.num_polys(), 1);
    assert_eq!(mesh.num_faces(), 6);
    assert_eq!(mesh.num_verts(), 8);
    assert_eq!(mesh.num_boundary_faces(), 6);

    let mut mesh = two_cubes();
    let shared = mesh.face_id(&vs(&[1, 2, 5, 6])).unwrap();
    mesh.remove_face(shared).unwrap();
    mesh.validate_invariants().unwrap();
    assert_eq!(mesh.num_polys(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_verts(), 0);
}

#[test]
fn remove_every_poly_empties_the_mesh() {
    let mut mesh = two_cubes();
    while mesh.num_polys() > 0 {
        mesh.remove_poly(PolyId::new(0)).unwrap();
    }
    mesh.validate_invariants().unwrap();
    assert_eq!(mesh.num_verts(), 0);
    assert_eq!(mesh.num_edges(), 0);
    assert_eq!(mesh.num_faces(), 0);
}

#[derive(Clone, Debug)]
enum Op {
    RemovePoly(usize),
    RemoveEdge(usize),
    RemoveVert(usize),
    SwitchVerts(usize, usize),
    SwitchPolys(usize, usize),
    AddVertex,
    AddEdge(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<usize>().prop_map(Op::RemovePoly),
        any::<usize>().prop_map(Op::RemoveEdge),
        any::<usize>().prop_map(Op::RemoveVert),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::SwitchVerts(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::SwitchPolys(a, b)),
        Just(Op::AddVertex),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::AddEdge(a, b)),
    ]
}

fn apply(m: &mut SurfaceMesh, op: &Op) {
    let (nv, ne, np) = (m.num_verts(), m.num_edges(), m.num_polys());
    match *op {
        Op::RemovePoly(i) if np > 0 => m.remove_poly(PolyId::new(i % np)).unwrap(),
        Op::RemoveEdge(i) if ne > 0 => m.remove_edge(EdgeId::new(i % ne)).unwrap(),
        Op::RemoveVert(i) if nv > 0 => m.remove_vert(VertId::new(i % nv)).unwrap(),
        Op::SwitchVerts(a, b) if nv > 0 => m.switch_id(VertId::new(a % nv), VertId::new(b % nv)).unwrap(),
        Op::SwitchPolys(a, b) if np > 0 => m.switch_id(PolyId::new(a % np), PolyId::new(b % np)).unwrap(),
        Op::AddVertex => {
            m.add_vertex([nv as f64, -1.0, 0.0]);
        }
        Op::AddEdge(a, b) if nv > 1 => {
            let (a, b) = (VertId::new(a % nv), VertId::new(b % nv));
            let exists = m.edge_id(a, b).is_some();
            let r = m.add_edge(a, b);
            assert_eq!(r.is_err(), a == b || exists, "add_edge({a}, {b}): {r:?}");
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn random_edits_keep_the_mesh_consistent(ops in prop::collection::vec(op(), 1..24)) {
        let mut m = quad_grid(3);
        for op in &ops {
            apply(&mut m, op);
            prop_assert!(m.validate_invariants().is_ok(), "after {:?}: {:?}", op, m.validate_invariants());
            prop_assert_eq!(m.verts().len(), m.num_verts());
            prop_assert_eq!(m.edges().len(), m.num_edges());
        }
    }
}

#[derive(Clone, Debug)]
enum VolumeOp {
    RemovePoly(usize),
    RemoveFace(usize),
    RemoveEdge(usize),
    RemoveVert(usize),
    DetachPoly(usize),
    DropFace(usize),
    DropEdge(usize),
    SwitchVerts(usize, usize),
    SwitchEdges(usize, usize),
    SwitchFaces(usize, usize),
    SwitchPolys(usize, usize),
    AddEdge(usize, usize),
    UpdateAdjacency,
}

fn volume_op() -> impl Strategy<Value = VolumeOp> {
    prop_oneof![
        any::<usize>().prop_map(VolumeOp::RemovePoly),
        any::<usize>().prop_map(VolumeOp::RemoveFace),
        any::<usize>().prop_map(VolumeOp::RemoveEdge),
        any::<usize>().prop_map(VolumeOp::RemoveVert),
        any::<usize>().prop_map(VolumeOp::DetachPoly),
        any::<usize>().prop_map(VolumeOp::DropFace),
        any::<usize>().prop_map(VolumeOp::DropEdge),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| VolumeOp::SwitchVerts(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| VolumeOp::SwitchEdges(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| VolumeOp::SwitchFaces(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| VolumeOp::SwitchPolys(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| VolumeOp::AddEdge(a, b)),
        Just(VolumeOp::UpdateAdjacency),
    ]
}

fn apply_volume(m: &mut HexMesh, op: &VolumeOp) {
    let (nv, ne, nf, np) = (m.num_verts(), m.num_edges(), m.num_faces(), m.num_polys());
    match *op {
        VolumeOp::RemovePoly(i) if np > 0 => m.remove_poly(PolyId::new(i % np)).unwrap(),
        VolumeOp::RemoveFace(i) if nf > 0 => m.remove_face(FaceId::new(i % nf)).unwrap(),
        VolumeOp::RemoveEdge(i) if ne > 0 => m.remove_edge(EdgeId::new(i % ne)).unwrap(),
        VolumeOp::RemoveVert(i) if nv > 0 => m.remove_vert(VertId::new(i % nv)).unwrap(),
        VolumeOp::DetachPoly(i) if np > 0 => m.remove_unreferenced(PolyId::new(i % np)).unwrap(),
        VolumeOp::DropFace(i) if nf > 0 => {
            let f = FaceId::new(i % nf);
            let used = !m.adj_f2p(f).is_empty();
            let r = m.remove_unreferenced(f);
            assert_eq!(r.is_err(), used, "remove_unreferenced({f}): {r:?}");
        }
        VolumeOp::DropEdge(i) if ne > 0 => {
            let e = EdgeId::new(i % ne);
            let used = !m.adj_e2f(e).is_empty() || !m.adj_e2p(e).is_empty();
            let r = m.remove_unreferenced(e);
            assert_eq!(r.is_err(), used, "remove_unreferenced({e}): {r:?}");
        }
        VolumeOp::SwitchVerts(a, b) if nv > 0 => m.switch_id(VertId::new(a % nv), VertId::new(b % nv)).unwrap(),
        VolumeOp::SwitchEdges(a, b) if ne > 0 => m.switch_id(EdgeId::new(a % ne), EdgeId::new(b % ne)).unwrap(),
        VolumeOp::SwitchFaces(a, b) if nf > 0 => m.switch_id(FaceId::new(a % nf), FaceId::new(b % nf)).unwrap(),
        VolumeOp::SwitchPolys(a, b) if np > 0 => m.switch_id(PolyId::new(a % np), PolyId::new(b % np)).unwrap(),
        VolumeOp::AddEdge(a, b) if nv > 1 => {
            let (a, b) = (VertId::new(a % nv), VertId::new(b % nv));
            let exists = m.edge_id(a, b).is_some();
            let r = m.add_edge(a, b);
            assert_eq!(r.is_err(), a == b || exists, "add_edge({a}, {b}): {r:?}");
        }
        VolumeOp::UpdateAdjacency => {
            let (nv, ne, nf, np) = (m.num_verts(), m.num_edges(), m.num_faces(), m.num_polys());
            m.update_adjacency().unwrap();
            assert_eq!((m.num_verts(), m.num_edges(), m.num_faces(), m.num_polys()), (nv, ne, nf, np));
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn random_volume_edits_keep_the_mesh_consistent(ops in prop::collection::vec(volume_op(), 1..24)) {
        let mut m = hex_block(2);
        for op in &ops {
            apply_volume(&mut m, op);
            prop_assert!(m.validate_invariants().is_ok(), "after {:?}: {:?}", op, m.validate_invariants());
            prop_assert_eq!(m.verts().len(), m.num_verts());
            prop_assert_eq!(m.edges().len(), m.num_edges());
        }
    }
}
