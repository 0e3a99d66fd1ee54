//! Geometry helpers: vector measures, bounding boxes and face tessellation.

pub mod bbox;
pub mod metrics;
pub mod tessellate;

pub use bbox::BoundingBox;
pub use tessellate::{Tessellation, TessellationMethod, TessellationOptions, tessellate};
