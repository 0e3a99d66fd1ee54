//! Polygon meshes: every poly is a single vertex ring.
//!
//! [`SurfaceMesh`] stores vertices, edges and polygons with their full
//! adjacency. At this tier an edge is boundary when fewer than two polygons
//! use it, and a vertex is boundary when it touches a boundary edge.
//!
//! ```
//! use polymesh_topology::prelude::*;
//!
//! let verts = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
//! let polys = vec![
//!     vec![VertId::new(0), VertId::new(1), VertId::new(2)],
//!     vec![VertId::new(0), VertId::new(2), VertId::new(3)],
//! ];
//! let mesh: SurfaceMesh = SurfaceMesh::from_polys(verts, polys)?;
//! assert_eq!(mesh.num_edges(), 5);
//! assert_eq!(mesh.adj_p2p(PolyId::new(0)), &[PolyId::new(1)]);
//! # Ok::<(), MeshError>(())
//! ```

mod edit;

use hashbrown::HashMap;

use crate::geometry::bbox::BoundingBox;
use crate::geometry::metrics::{enclosed_volume, newell_normal, normalize, polygon_area, triangle_area};
use crate::geometry::tessellate::{Tessellation, tessellate};
use crate::mesh_error::MeshError;
use crate::topology::attributes::{AttributeSchema, Labeled, StdAttributes, distinct_labels, ids_with_label};
use crate::topology::builder::{SurfaceTables, build_surface};
use crate::topology::connectivity::SurfaceConnectivity;
use crate::topology::core::{MeshCore, ring_pairs};
use crate::topology::ids::{EdgeId, PolyId, VertId, canonical_pair};
use crate::topology::options::MeshOptions;
use crate::topology::query::{MeshTopology, delegate_mesh_topology};
use crate::topology::shape::PolyShape;

/// A mesh of polygons with arbitrary valence.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh<A: AttributeSchema = StdAttributes> {
    pub(crate) core: MeshCore<A>,
    /// Triangulation of each polygon, parallel to the poly array.
    pub(crate) poly_tess: Vec<Tessellation>,
    /// Unit normal of each polygon (zero for degenerate rings).
    pub(crate) poly_normals: Vec<[f64; 3]>,
    pub(crate) options: MeshOptions,
}

delegate_mesh_topology!([A: AttributeSchema] SurfaceMesh<A>, A);

impl<A: AttributeSchema> SurfaceMesh<A> {
    /// An empty mesh with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options. Cached tessellations are recomputed.
    pub fn with_options(mut self, options: MeshOptions) -> Result<Self, MeshError> {
        self.options = options;
        self.refresh_all_geometry()?;
        Ok(self)
    }

    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Builds a mesh from vertex positions and polygon rings.
    pub fn from_polys(verts: Vec<[f64; 3]>, polys: Vec<Vec<VertId>>) -> Result<Self, MeshError> {
        Self::from_polys_with(verts, polys, MeshOptions::default())
    }

    /// Same as [`from_polys`](Self::from_polys) with explicit options.
    pub fn from_polys_with(
        verts: Vec<[f64; 3]>,
        polys: Vec<Vec<VertId>>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        let tables = build_surface(verts.len(), &polys)?;
        let mut mesh = Self {
            options,
            ..Self::default()
        };
        mesh.core.bbox = BoundingBox::from_points(&verts);
        mesh.core.verts = verts;
        mesh.install(polys, tables)?;
        Ok(mesh)
    }

    /// Rebuilds a mesh from an exported snapshot.
    pub fn from_connectivity(conn: SurfaceConnectivity) -> Result<Self, MeshError> {
        Self::from_polys(conn.verts, conn.polys)
    }

    /// Snapshot of positions and rings, enough to rebuild this mesh.
    pub fn connectivity(&self) -> SurfaceConnectivity {
        SurfaceConnectivity {
            verts: self.core.verts.clone(),
            polys: self.core.p2v.clone(),
        }
    }

    /// Replaces every derived table with the output of `tables`, keeping
    /// positions and per-vertex / per-poly attributes.
    fn install(&mut self, polys: Vec<Vec<VertId>>, tables: SurfaceTables) -> Result<(), MeshError> {
        let SurfaceTables {
            edges,
            v2v,
            v2e,
            v2p,
            e2p,
            p2e,
            p2p,
            vert_bnd,
            edge_bnd,
        } = tables;
        let core = &mut self.core;
        core.edge_attrs = vec![A::Edge::default(); edges.len()];
        core.edges = edges;
        core.v2v = v2v;
        core.v2e = v2e;
        core.v2p = v2p;
        core.e2p = e2p;
        core.p2e = p2e;
        core.p2p = p2p;
        core.vert_bnd = vert_bnd;
        core.edge_bnd = edge_bnd;
        core.p2v = polys;
        core.vert_attrs.resize_with(core.verts.len(), Default::default);
        core.poly_attrs.resize_with(core.p2v.len(), Default::default);
        self.refresh_all_geometry()
    }

    /// Recomputes every derived table from the current positions and rings.
    ///
    /// Edges used by no polygon are kept, and edge attributes follow their
    /// vertex pair. On error the mesh is left untouched.
    pub fn update_adjacency(&mut self) -> Result<(), MeshError> {
        let tables = build_surface(self.core.num_verts(), &self.core.p2v)?;

        let mut kept: HashMap<(VertId, VertId), A::Edge> = HashMap::with_capacity(self.core.num_edges());
        let mut loose = Vec::new();
        for (i, &[a, b]) in self.core.edges.iter().enumerate() {
            kept.insert(canonical_pair(a, b), self.core.edge_attrs[i].clone());
            if self.core.e2p[i].is_empty() {
                loose.push((a, b));
            }
        }

        let polys = std::mem::take(&mut self.core.p2v);
        self.install(polys, tables)?;
        for (a, b) in loose {
            self.core.push_edge(a, b, true);
            self.core.vert_bnd[a.idx()] = true;
            self.core.vert_bnd[b.idx()] = true;
        }
        for (i, &[a, b]) in self.core.edges.iter().enumerate() {
            if let Some(attr) = kept.remove(&canonical_pair(a, b)) {
                self.core.edge_attrs[i] = attr;
            }
        }
        Ok(())
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        self.core.clear();
        self.poly_tess.clear();
        self.poly_normals.clear();
    }

    /// Recomputes the tight bounding box of the vertices.
    pub fn update_bbox(&mut self) {
        self.core.bbox = BoundingBox::from_points(&self.core.verts);
    }

    /// Moves vertex `v`, refreshing the geometry of its polygons.
    pub fn set_vert(&mut self, v: VertId, pos: [f64; 3]) -> Result<(), MeshError> {
        self.core.check_vert(v)?;
        self.core.verts[v.idx()] = pos;
        self.core.bbox.extend(pos);
        for i in 0..self.core.v2p[v.idx()].len() {
            let p = self.core.v2p[v.idx()][i];
            self.refresh_poly_geometry(p)?;
        }
        Ok(())
    }

    fn poly_geometry(&self, p: PolyId) -> Result<(Tessellation, [f64; 3]), MeshError> {
        let ring = &self.core.p2v[p.idx()];
        let tess = tessellate(ring, &self.core.verts, &self.options.tessellation)?;
        let points: Vec<[f64; 3]> = ring.iter().map(|v| self.core.verts[v.idx()]).collect();
        let normal = normalize(newell_normal(&points)).unwrap_or([0.0; 3]);
        Ok((tess, normal))
    }

    pub(crate) fn refresh_poly_geometry(&mut self, p: PolyId) -> Result<(), MeshError> {
        let (tess, normal) = self.poly_geometry(p)?;
        self.poly_tess[p.idx()] = tess;
        self.poly_normals[p.idx()] = normal;
        Ok(())
    }

    fn refresh_all_geometry(&mut self) -> Result<(), MeshError> {
        let n = self.core.num_polys();
        let mut tess = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let (t, nrm) = self.poly_geometry(PolyId::new(i))?;
            tess.push(t);
            normals.push(nrm);
        }
        self.poly_tess = tess;
        self.poly_normals = normals;
        Ok(())
    }

    /// Boundary flag of edge `e` from its current poly count.
    pub(crate) fn refresh_edge_boundary(&mut self, e: EdgeId) {
        self.core.edge_bnd[e.idx()] = self.core.e2p[e.idx()].len() < 2;
    }

    /// Boundary flag of vertex `v` from its incident edges.
    pub(crate) fn refresh_vert_boundary(&mut self, v: VertId) {
        let core = &self.core;
        let bnd = core.v2e[v.idx()].iter().any(|e| core.edge_bnd[e.idx()]);
        self.core.vert_bnd[v.idx()] = bnd;
    }

    // ---- queries -------------------------------------------------------

    /// Cached triangulation of polygon `p`.
    pub fn poly_tessellation(&self, p: PolyId) -> &Tessellation {
        &self.poly_tess[p.idx()]
    }

    /// Unit normal of polygon `p`, following the right-hand rule on its ring.
    pub fn poly_normal(&self, p: PolyId) -> [f64; 3] {
        self.poly_normals[p.idx()]
    }

    /// Area of polygon `p`, summed over its triangulation.
    pub fn poly_area(&self, p: PolyId) -> f64 {
        let v = &self.core.verts;
        self.poly_tess[p.idx()]
            .iter()
            .map(|[a, b, c]| triangle_area(v[a.idx()], v[b.idx()], v[c.idx()]))
            .sum()
    }

    /// Planar (Newell) area of polygon `p`, independent of the triangulation.
    pub fn poly_ring_area(&self, p: PolyId) -> f64 {
        let points: Vec<[f64; 3]> = self.core.p2v[p.idx()]
            .iter()
            .map(|v| self.core.verts[v.idx()])
            .collect();
        polygon_area(&points)
    }

    /// Total surface area.
    pub fn mesh_area(&self) -> f64 {
        (0..self.num_polys()).map(|i| self.poly_area(PolyId::new(i))).sum()
    }

    /// Volume enclosed by the surface, assuming it is closed and its rings
    /// are oriented consistently outward. Negative for inward orientation.
    pub fn mesh_volume(&self) -> f64 {
        let v = &self.core.verts;
        enclosed_volume(
            self.poly_tess
                .iter()
                .flat_map(|t| t.iter())
                .map(|[a, b, c]| [v[a.idx()], v[b.idx()], v[c.idx()]]),
        )
    }

    /// An edge shared by `p` and `q`, if any.
    pub fn poly_shared_edge(&self, p: PolyId, q: PolyId) -> Option<EdgeId> {
        self.core.p2e[p.idx()]
            .iter()
            .copied()
            .find(|e| self.core.p2e[q.idx()].contains(e))
    }

    /// Whether the ring of `p` traverses edge `e` from its first to its
    /// second stored vertex.
    pub fn poly_edge_is_ccw(&self, p: PolyId, e: EdgeId) -> bool {
        let [a, b] = self.core.edges[e.idx()];
        ring_pairs(&self.core.p2v[p.idx()]).any(|pair| pair == (a, b))
    }

    /// Position of vertex `v` in the ring of `p`.
    pub fn poly_vert_offset(&self, p: PolyId, v: VertId) -> Option<usize> {
        self.core.p2v[p.idx()].iter().position(|&w| w == v)
    }

    /// `V - E + P`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_verts() as i64 - self.num_edges() as i64 + self.num_polys() as i64
    }

    /// Whether the mesh has no boundary edge.
    pub fn is_closed(&self) -> bool {
        self.num_polys() > 0 && self.num_boundary_edges() == 0
    }

    pub fn poly_shape(&self, p: PolyId) -> PolyShape {
        PolyShape::from_polygon(self.core.p2v[p.idx()].len())
    }

    /// Copy of every polygon ring.
    pub fn vector_polys(&self) -> Vec<Vec<VertId>> {
        self.core.p2v.clone()
    }

    /// Whether `p` has an edge on the boundary.
    pub fn poly_is_on_surf(&self, p: PolyId) -> bool {
        self.core.p2e[p.idx()].iter().any(|e| self.core.edge_bnd[e.idx()])
    }

    /// Boundary edges of `p`.
    pub fn poly_boundary_edges(&self, p: PolyId) -> Vec<EdgeId> {
        self.core.p2e[p.idx()]
            .iter()
            .copied()
            .filter(|e| self.core.edge_bnd[e.idx()])
            .collect()
    }
}

impl<A> SurfaceMesh<A>
where
    A: AttributeSchema,
    A::Poly: Labeled,
{
    /// Polygons whose attribute label is `label`.
    pub fn polys_with_label(&self, label: i32) -> Vec<PolyId> {
        ids_with_label(&self.core.poly_attrs, label)
            .into_iter()
            .map(PolyId::new)
            .collect()
    }

    /// Distinct polygon labels in ascending order.
    pub fn poly_labels(&self) -> Vec<i32> {
        distinct_labels(&self.core.poly_attrs)
    }
}
