//! MeshError: unified error type for polymesh-topology public APIs
//!
//! Every fallible operation validates its preconditions before touching any
//! table, so an `Err` always means the mesh was left exactly as it was.

use thiserror::Error;

use crate::topology::ids::{EntityKind, FaceId, VertId};

/// Coarse classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad input caught before any mutation (dangling id, duplicate edge, ...).
    PreconditionViolation,
    /// A face or edge would exceed two incident polys.
    NonManifoldTopology,
    /// Zero-area or otherwise unusable geometry.
    DegenerateGeometry,
    /// The tables disagree with each other. Unreachable through valid call sequences.
    InternalInvariantBroken,
}

/// Unified error type for mesh topology operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An id does not address a live entity.
    #[error("{kind} id {id} out of range (count = {len})")]
    IdOutOfRange {
        kind: EntityKind,
        id: usize,
        len: usize,
    },
    /// An edge from a vertex to itself was requested.
    #[error("degenerate edge: both endpoints are vertex {0}")]
    DegenerateEdge(VertId),
    /// The unordered vertex pair already has an edge.
    #[error("edge ({0}, {1}) already exists")]
    DuplicateEdge(VertId, VertId),
    /// A face with the same vertex set already exists.
    #[error("a face with the same vertices already exists: {0}")]
    DuplicateFace(FaceId),
    /// A poly with the same vertex or face set already exists.
    #[error("a poly with the same boundary already exists: {0}")]
    DuplicatePoly(usize),
    /// A vertex ring with fewer than three entries.
    #[error("vertex ring has {0} entries, at least 3 are required")]
    RingTooShort(usize),
    /// A vertex appears more than once in one ring.
    #[error("vertex {0} repeated in ring")]
    RepeatedVertex(VertId),
    /// A polyhedron with no faces.
    #[error("poly has no faces")]
    EmptyPoly,
    /// A face appears more than once in one polyhedron.
    #[error("face {0} repeated in poly")]
    RepeatedFace(FaceId),
    /// Winding flags do not match the face list.
    #[error("winding list length mismatch: {faces} faces, {windings} flags")]
    WindingMismatch { faces: usize, windings: usize },
    /// Removal of an entity that other entities still reference.
    #[error("{kind} {id} is still referenced by {refs} higher-dimensional entities")]
    StillReferenced {
        kind: EntityKind,
        id: usize,
        refs: usize,
    },
    /// A cell list does not have the vertex count of the element kind.
    #[error("cell has {found} vertices, expected {expected}")]
    CellSizeMismatch { expected: usize, found: usize },
    /// Operation not available for this kind of mesh.
    #[error("unsupported for this mesh kind: {0}")]
    UnsupportedKind(&'static str),
    /// A face (volume) or edge (surface) would have more than two incident polys.
    #[error("non-manifold {kind} {id}: {incident} incident polys")]
    NonManifold {
        kind: EntityKind,
        id: usize,
        incident: usize,
    },
    /// Geometry unusable for the requested operation.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// Adjacency tables are inconsistent.
    #[error("invariant broken: {0}")]
    InvariantBroken(String),
}

impl MeshError {
    /// Returns the taxonomy bucket of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MeshError::NonManifold { .. } => ErrorCategory::NonManifoldTopology,
            MeshError::DegenerateGeometry(_) => ErrorCategory::DegenerateGeometry,
            MeshError::InvariantBroken(_) => ErrorCategory::InternalInvariantBroken,
            _ => ErrorCategory::PreconditionViolation,
        }
    }

    pub(crate) fn out_of_range(kind: EntityKind, id: usize, len: usize) -> Self {
        MeshError::IdOutOfRange { kind, id, len }
    }

    pub(crate) fn broken(msg: impl Into<String>) -> Self {
        MeshError::InvariantBroken(msg.into())
    }
}
