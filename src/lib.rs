//! # polymesh-topology
//!
//! polymesh-topology is the topology engine of a mesh-processing stack. Given
//! vertex positions and element connectivity (polygons, or polyhedra bounded
//! by polygonal faces) it builds and maintains a self-consistent adjacency
//! graph between vertices, edges, faces and polys, classifies every entity as
//! boundary or interior, and triangulates arbitrary (non-convex, non-planar)
//! faces.
//!
//! ## Features
//! - Two mesh tiers sharing one query trait: [`SurfaceMesh`] and [`VolumeMesh`]
//! - One-pass adjacency construction with non-manifold detection
//! - Incremental insertion, id switching and swap-and-pop removal that keep
//!   every relation symmetric
//! - Fan / ear-clipping tessellation with a best-effort fallback
//! - Full invariant validation (`DebugInvariants`), optionally after every
//!   mutation with the `check-invariants` feature
//!
//! ## Ids
//!
//! Entities are addressed by dense ids ([`VertId`], [`EdgeId`], [`FaceId`],
//! [`PolyId`]). Removing an entity moves the last entity of its kind into the
//! freed slot, so ids held across a removal may change meaning.
//!
//! ## Usage
//!
//! ```
//! use polymesh_topology::prelude::*;
//!
//! let verts = vec![
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//! ];
//! let cells = vec![(0..4).map(VertId::new).collect::<Vec<_>>()];
//! let mut tet = TetMesh::from_cells(verts, &cells)?;
//! assert_eq!(tet.num_faces(), 4);
//! assert!((tet.mesh_volume() - 1.0 / 6.0).abs() < 1e-12);
//!
//! // A vertex still used by the tet cannot be removed on its own.
//! let err = tet.remove_unreferenced(VertId::new(0)).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::PreconditionViolation);
//! # Ok::<(), MeshError>(())
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mesh_error::{ErrorCategory, MeshError};
pub use topology::ids::{EdgeId, FaceId, PolyId, VertId};
pub use topology::surface::SurfaceMesh;
pub use topology::volume::VolumeMesh;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::bbox::BoundingBox;
    pub use crate::geometry::tessellate::{Tessellation, TessellationMethod, TessellationOptions};
    pub use crate::mesh_error::{ErrorCategory, MeshError};
    pub use crate::topology::attributes::{AttributeSchema, Labeled, Marked, StdAttributes};
    pub use crate::topology::connectivity::{SurfaceConnectivity, VolumeConnectivity};
    pub use crate::topology::edit::TopologyEdit;
    pub use crate::topology::ids::{DenseId, EdgeId, EntityKind, FaceId, PolyId, VertId};
    pub use crate::topology::options::MeshOptions;
    pub use crate::topology::query::MeshTopology;
    pub use crate::topology::shape::PolyShape;
    pub use crate::topology::surface::SurfaceMesh;
    pub use crate::topology::volume::{
        HexMesh, Hexahedra, Polyhedra, TetMesh, Tetrahedra, VolumeKind, VolumeMesh,
    };
}
