mod util;
use polymesh_topology::prelude::*;
use util::*;

#[test]
fn surface_snapshot_through_json() {
    let grid = quad_grid(2);
    let json = serde_json::to_string(&grid.connectivity()).unwrap();
    let conn: SurfaceConnectivity = serde_json::from_str(&json).unwrap();
    let back: SurfaceMesh = SurfaceMesh::from_connectivity(conn).unwrap();
    back.validate_invariants().unwrap();
    assert_eq!(back.vector_polys(), grid.vector_polys());
    assert_eq!(back.edges(), grid.edges());
    assert_eq!(back.num_boundary_edges(), 8);
}

#[test]
fn volume_snapshot_through_json() {
    let mesh = two_cubes();
    let json = serde_json::to_value(mesh.connectivity()).unwrap();
    assert_eq!(json["faces"].as_array().unwrap().len(), 11);
    assert_eq!(json["winding"][1][3], serde_json::json!(false));

    let conn: VolumeConnectivity = serde_json::from_value(json).unwrap();
    let back = HexMesh::from_connectivity(conn).unwrap();
    back.validate_invariants().unwrap();
    assert_eq!(back.vector_faces(), mesh.vector_faces());
    assert_eq!(back.vector_winding(), mesh.vector_winding());
    assert_eq!(back.num_boundary_faces(), 10);
    assert!(approx(back.mesh_volume(), 2.0));
}

#[test]
fn malformed_snapshot_is_rejected() {
    let json = r#"{"verts": [[0,0,0],[1,0,0],[0,1,0]], "polys": [[0, 1, 5]]}"#;
    let conn: SurfaceConnectivity = serde_json::from_str(json).unwrap();
    let err = SurfaceMesh::<StdAttributes>::from_connectivity(conn).unwrap_err();
    assert!(matches!(err, MeshError::IdOutOfRange { kind: EntityKind::Vertex, id: 5, len: 3 }));
}

#[test]
fn options_serialize() {
    let opts = MeshOptions::default();
    let json = serde_json::to_string(&opts).unwrap();
    let back: MeshOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, opts);
}
