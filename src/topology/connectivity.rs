//! Plain connectivity snapshots for import and export.
//!
//! A snapshot holds only what is needed to rebuild a mesh: vertex positions
//! and element rings. All adjacency is derived again on import.

use serde::{Deserialize, Serialize};

use crate::topology::ids::{FaceId, VertId};

/// Vertices and polygon rings of a surface mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConnectivity {
    pub verts: Vec<[f64; 3]>,
    pub polys: Vec<Vec<VertId>>,
}

/// Vertices, face rings, poly face lists and windings of a volume mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeConnectivity {
    pub verts: Vec<[f64; 3]>,
    pub faces: Vec<Vec<VertId>>,
    pub polys: Vec<Vec<FaceId>>,
    /// Parallel to `polys`: `true` when the face ring is counter-clockwise
    /// seen from outside the poly.
    pub winding: Vec<Vec<bool>>,
}
