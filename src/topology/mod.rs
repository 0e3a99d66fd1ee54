//! Mesh topology: dense entity tables and their adjacency.
//!
//! This module provides the two mesh tiers and everything they share:
//! - [`SurfaceMesh`]: polygons with arbitrary valence
//! - [`VolumeMesh`]: polyhedra bounded by polygonal faces, specialised by a
//!   [`VolumeKind`]
//! - [`MeshTopology`]: the read-only query trait both implement
//! - [`TopologyEdit`]: id-generic renaming and removal
//!
//! Adjacency is built in one pass from raw connectivity and then kept
//! consistent by every mutation.

pub mod attributes;
pub(crate) mod builder;
pub mod connectivity;
pub(crate) mod core;
pub mod edit;
pub mod ids;
pub mod options;
pub mod query;
pub mod shape;
pub mod surface;
mod validation;
pub mod volume;

pub use attributes::{AttributeSchema, Labeled, Marked, NoAttributes, StdAttributes};
pub use connectivity::{SurfaceConnectivity, VolumeConnectivity};
pub use edit::TopologyEdit;
pub use ids::{DenseId, EdgeId, EntityKind, FaceId, PolyId, VertId};
pub use options::MeshOptions;
pub use query::MeshTopology;
pub use shape::PolyShape;
pub use surface::SurfaceMesh;
pub use volume::{HexMesh, Hexahedra, Polyhedra, TetMesh, Tetrahedra, VolumeKind, VolumeMesh};
