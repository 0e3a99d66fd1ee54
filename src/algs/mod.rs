//! Algorithms built on the query API.

pub mod adjacency_graph;
pub mod boundary;

pub use adjacency_graph::{AdjacencyGraph, poly_dual_graph, vertex_graph};
pub use boundary::{BoundaryClassification, extract_boundary_surface};
