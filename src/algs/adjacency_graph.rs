//! CSR adjacency graphs for partitioners and graph algorithms.
//!
//! Graph vertices are entity indices (`0..count`), neighbor lists are sorted,
//! deduplicated and symmetric, and never contain the vertex itself.

use itertools::Itertools;

use crate::topology::attributes::AttributeSchema;
use crate::topology::ids::{FaceId, PolyId, VertId};
use crate::topology::query::MeshTopology;
use crate::topology::volume::{VolumeKind, VolumeMesh};

/// CSR-style adjacency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    /// CSR offsets into `adjncy` for each vertex.
    pub xadj: Vec<usize>,
    /// Concatenated neighbor lists.
    pub adjncy: Vec<usize>,
}

impl AdjacencyGraph {
    /// Builds a graph from one neighbor list per vertex. Lists are sorted,
    /// deduplicated and stripped of self loops.
    pub fn from_rows<R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = usize>,
    {
        let mut xadj = vec![0];
        let mut adjncy = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            adjncy.extend(row.into_iter().filter(|&j| j != i).sorted_unstable().dedup());
            xadj.push(adjncy.len());
        }
        Self { xadj, adjncy }
    }

    /// Neighbor index slice of vertex `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjncy[self.xadj[i]..self.xadj[i + 1]]
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.adjncy.len() / 2
    }

    /// Whether every `j ∈ N(i)` has `i ∈ N(j)`.
    pub fn is_symmetric(&self) -> bool {
        (0..self.num_vertices()).all(|i| {
            self.neighbors(i)
                .iter()
                .all(|&j| self.neighbors(j).binary_search(&i).is_ok())
        })
    }
}

/// What two polys must share to be adjacent in the dual graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SharedEntity {
    /// A facet: an edge for polygons, a face for polyhedra.
    #[default]
    Facet,
    /// Any vertex.
    Vertex,
}

/// Options for [`poly_dual_graph`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CellAdjacencyOpts {
    pub through: SharedEntity,
}

/// Poly-to-poly graph of a mesh.
pub fn poly_dual_graph<M: MeshTopology>(mesh: &M, opts: CellAdjacencyOpts) -> AdjacencyGraph {
    let rows = (0..mesh.num_polys()).map(PolyId::new).map(|p| -> Vec<usize> {
        match opts.through {
            SharedEntity::Facet => mesh.adj_p2p(p).iter().map(|q| q.idx()).collect(),
            SharedEntity::Vertex => mesh
                .adj_p2v(p)
                .iter()
                .flat_map(|&v| mesh.adj_v2p(v))
                .map(|q| q.idx())
                .collect(),
        }
    });
    AdjacencyGraph::from_rows(rows)
}

/// Vertex-to-vertex graph along the mesh edges.
pub fn vertex_graph<M: MeshTopology>(mesh: &M) -> AdjacencyGraph {
    AdjacencyGraph::from_rows(
        (0..mesh.num_verts())
            .map(VertId::new)
            .map(|v| mesh.adj_v2v(v).iter().map(|w| w.idx()).collect::<Vec<_>>()),
    )
}

/// Face-to-face graph of a polyhedral mesh: faces sharing an edge.
pub fn face_graph<K: VolumeKind, A: AttributeSchema>(mesh: &VolumeMesh<K, A>) -> AdjacencyGraph {
    AdjacencyGraph::from_rows(
        (0..mesh.num_faces())
            .map(FaceId::new)
            .map(|f| mesh.adj_f2f(f).iter().map(|g| g.idx()).collect::<Vec<_>>()),
    )
}
