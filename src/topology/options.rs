//! Per-mesh configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::tessellate::TessellationOptions;

/// Options carried by a mesh and applied to every rebuild and mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Tessellation settings used for face normals, areas and volumes.
    pub tessellation: TessellationOptions,
    /// Warn (via `log`) when a shared face has the same winding in both of its polys.
    pub check_winding: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            tessellation: TessellationOptions::default(),
            check_winding: true,
        }
    }
}
