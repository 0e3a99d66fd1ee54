//! Face tessellation: polygon rings to triangle lists.
//!
//! The common case (convex, planar) is a fan from the first ring vertex. A
//! fan is rejected as soon as two of its triangles fold back onto each other;
//! the ring is then projected on its best-fit plane and ear-clipped in 2-D.
//! Rings that are degenerate (collinear, coincident vertices, strongly
//! non-planar) still get `n - 2` triangles, flagged as best effort.
//!
//! The output is always a flattened list of vertex ids, three per triangle,
//! ordered consistently with the input ring.

use serde::{Deserialize, Serialize};

use crate::geometry::metrics::{EPS, cross, dot, newell_normal, norm, normalize, sub, triangle_cross};
use crate::mesh_error::MeshError;
use crate::topology::ids::{EntityKind, VertId};

/// Tuning knobs for [`tessellate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TessellationOptions {
    /// Minimum cosine between consecutive fan triangle normals for the fan to
    /// be accepted. `0.0` accepts anything that does not fold back.
    pub fold_tolerance: f64,
    /// Relative area below which a triangle counts as degenerate.
    pub convexity_epsilon: f64,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            fold_tolerance: 0.0,
            convexity_epsilon: 1e-12,
        }
    }
}

/// How a tessellation was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TessellationMethod {
    /// Trivial fan from the first ring vertex.
    Fan,
    /// Ear clipping on the best-fit plane projection.
    EarClip,
    /// Degenerate input; triangles are valid ids but may overlap or have zero area.
    BestEffort,
}

/// Triangulation of one ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tessellation {
    /// Flattened triangles, three vertex ids each.
    pub triangles: Vec<VertId>,
    pub method: TessellationMethod,
}

impl Tessellation {
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Iterates the triangles as `[v0, v1, v2]`.
    pub fn iter(&self) -> impl Iterator<Item = [VertId; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.method == TessellationMethod::BestEffort
    }

    /// Turns a best-effort result into a [`MeshError::DegenerateGeometry`].
    pub fn into_strict(self) -> Result<Self, MeshError> {
        if self.is_degenerate() {
            Err(MeshError::DegenerateGeometry(format!(
                "ring of {} vertices has no valid triangulation",
                self.num_triangles() + 2
            )))
        } else {
            Ok(self)
        }
    }
}

/// Tessellates the ring `ring`, whose vertex positions are looked up in `verts`.
pub fn tessellate(
    ring: &[VertId],
    verts: &[[f64; 3]],
    opts: &TessellationOptions,
) -> Result<Tessellation, MeshError> {
    let n = ring.len();
    if n < 3 {
        return Err(MeshError::RingTooShort(n));
    }
    let mut points = Vec::with_capacity(n);
    for &v in ring {
        let p = verts
            .get(v.idx())
            .ok_or_else(|| MeshError::out_of_range(EntityKind::Vertex, v.idx(), verts.len()))?;
        points.push(*p);
    }

    let eps_area = area_epsilon(&points, opts);
    let newell = newell_normal(&points);

    if fan_is_valid(&points, newell, eps_area, opts) {
        return Ok(Tessellation {
            triangles: fan(ring, 0..n),
            method: TessellationMethod::Fan,
        });
    }

    let Some(axis) = normalize(newell) else {
        log::warn!("best-effort tessellation: ring of {n} vertices has no supporting plane");
        return Ok(Tessellation {
            triangles: fan(ring, 0..n),
            method: TessellationMethod::BestEffort,
        });
    };

    log::debug!("fan rejected for ring of {n} vertices, ear clipping");
    let projected = project(&points, axis);
    let (local, complete) = ear_clip(&projected, eps_area);
    let triangles = local.iter().map(|&i| ring[i]).collect();
    let method = if complete {
        TessellationMethod::EarClip
    } else {
        log::warn!("best-effort tessellation: ear clipping stalled on ring of {n} vertices");
        TessellationMethod::BestEffort
    };
    Ok(Tessellation { triangles, method })
}

fn area_epsilon(points: &[[f64; 3]], opts: &TessellationOptions) -> f64 {
    let n = points.len();
    let longest = (0..n)
        .map(|i| norm(sub(points[(i + 1) % n], points[i])))
        .fold(0.0_f64, f64::max);
    (opts.convexity_epsilon * longest * longest).max(EPS * EPS)
}

fn fan(ring: &[VertId], order: impl Iterator<Item = usize>) -> Vec<VertId> {
    let order: Vec<usize> = order.collect();
    let mut out = Vec::with_capacity(3 * order.len().saturating_sub(2));
    for w in order.windows(2).skip(1) {
        out.extend([ring[order[0]], ring[w[0]], ring[w[1]]]);
    }
    out
}

/// A fan from vertex 0 is valid when no triangle is degenerate, consecutive
/// triangle normals agree within `fold_tolerance`, and none opposes the ring normal.
fn fan_is_valid(
    points: &[[f64; 3]],
    newell: [f64; 3],
    eps_area: f64,
    opts: &TessellationOptions,
) -> bool {
    let n = points.len();
    let normals: Vec<[f64; 3]> = (1..n - 1)
        .map(|i| triangle_cross(points[0], points[i], points[i + 1]))
        .collect();
    if normals.iter().any(|c| 0.5 * norm(*c) <= eps_area) {
        return false;
    }
    if normals.iter().any(|c| dot(*c, newell) < 0.0) {
        return false;
    }
    normals
        .windows(2)
        .all(|w| dot(w[0], w[1]) >= opts.fold_tolerance * norm(w[0]) * norm(w[1]))
}

/// Projects the ring onto the plane orthogonal to `axis`, keeping its
/// orientation: a ring wound counter-clockwise around `axis` stays CCW in 2-D.
fn project(points: &[[f64; 3]], axis: [f64; 3]) -> Vec<[f64; 2]> {
    let least = (0..3)
        .min_by(|&a, &b| axis[a].abs().total_cmp(&axis[b].abs()))
        .unwrap_or(0);
    let mut e = [0.0; 3];
    e[least] = 1.0;
    let u = normalize(cross(axis, e)).unwrap_or([1.0, 0.0, 0.0]);
    let w = cross(axis, u);
    let o = points[0];
    points
        .iter()
        .map(|p| {
            let d = sub(*p, o);
            [dot(d, u), dot(d, w)]
        })
        .collect()
}

fn signed_area_2d(pts: &[[f64; 2]]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += pts[i][0] * pts[j][1] - pts[j][0] * pts[i][1];
    }
    0.5 * area
}

#[inline]
fn orient_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Closed-triangle containment, so points on an edge block the ear.
fn point_in_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    let d1 = orient_2d(a, b, p);
    let d2 = orient_2d(b, c, p);
    let d3 = orient_2d(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Ear clipping over local indices. Returns the flattened triangles in the
/// input ring orientation and whether clipping finished without stalling.
fn ear_clip(pts: &[[f64; 2]], eps_area: f64) -> (Vec<usize>, bool) {
    let n = pts.len();
    let mut remaining: Vec<usize> = (0..n).collect();
    let reversed = signed_area_2d(pts) < 0.0;
    if reversed {
        remaining.reverse();
    }

    let mut out = Vec::with_capacity(3 * (n - 2));
    let emit = |a: usize, b: usize, c: usize, out: &mut Vec<usize>| {
        if reversed {
            out.extend([c, b, a]);
        } else {
            out.extend([a, b, c]);
        }
    };

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let curr = remaining[i];
            let next = remaining[(i + 1) % len];
            let (a, b, c) = (pts[prev], pts[curr], pts[next]);
            if 0.5 * orient_2d(a, b, c) <= eps_area {
                return false;
            }
            remaining
                .iter()
                .filter(|&&k| k != prev && k != curr && k != next)
                .all(|&k| !point_in_triangle(pts[k], a, b, c))
        });
        match ear {
            Some(i) => {
                let prev = remaining[(i + len - 1) % len];
                let next = remaining[(i + 1) % len];
                emit(prev, remaining[i], next, &mut out);
                remaining.remove(i);
            }
            None => {
                for w in remaining.windows(2).skip(1) {
                    emit(remaining[0], w[0], w[1], &mut out);
                }
                return (out, false);
            }
        }
    }
    emit(remaining[0], remaining[1], remaining[2], &mut out);
    (out, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::metrics::triangle_area;

    fn ids(n: usize) -> Vec<VertId> {
        (0..n).map(VertId::new).collect()
    }

    fn area(t: &Tessellation, verts: &[[f64; 3]]) -> f64 {
        t.iter()
            .map(|[a, b, c]| triangle_area(verts[a.idx()], verts[b.idx()], verts[c.idx()]))
            .sum()
    }

    #[test]
    fn triangle_is_a_fan() {
        let verts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let t = tessellate(&ids(3), &verts, &TessellationOptions::default()).unwrap();
        assert_eq!(t.method, TessellationMethod::Fan);
        assert_eq!(t.triangles, ids(3));
    }

    #[test]
    fn convex_quad_is_a_fan() {
        let verts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let t = tessellate(&ids(4), &verts, &TessellationOptions::default()).unwrap();
        assert_eq!(t.method, TessellationMethod::Fan);
        assert_eq!(t.num_triangles(), 2);
        assert!((area(&t, &verts) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reflex_start_falls_back_to_ear_clipping() {
        // L-shape starting at a vertex that cannot see the whole polygon.
        let verts = [
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0],
        ];
        let t = tessellate(&ids(6), &verts, &TessellationOptions::default()).unwrap();
        assert_eq!(t.method, TessellationMethod::EarClip);
        assert_eq!(t.num_triangles(), 4);
        assert!((area(&t, &verts) - 3.0).abs() < 1e-12);
        // every triangle keeps the ring orientation (+z)
        for [a, b, c] in t.iter() {
            let n = triangle_cross(verts[a.idx()], verts[b.idx()], verts[c.idx()]);
            assert!(n[2] > 0.0);
        }
    }

    #[test]
    fn clockwise_ring_keeps_its_orientation() {
        let verts = [
            [0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [1.0, 2.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 0.0, 0.0],
        ];
        // reversed L starting at a reflex-blind corner
        let ring: Vec<VertId> = [4, 5, 0, 1, 2, 3].into_iter().map(VertId::new).collect();
        let t = tessellate(&ring, &verts, &TessellationOptions::default()).unwrap();
        assert_eq!(t.num_triangles(), 4);
        assert!((area(&t, &verts) - 3.0).abs() < 1e-12);
        for [a, b, c] in t.iter() {
            let n = triangle_cross(verts[a.idx()], verts[b.idx()], verts[c.idx()]);
            assert!(n[2] < 0.0);
        }
    }

    #[test]
    fn collinear_ring_is_best_effort() {
        let verts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ];
        let t = tessellate(&ids(4), &verts, &TessellationOptions::default()).unwrap();
        assert!(t.is_degenerate());
        assert_eq!(t.num_triangles(), 2);
        let err = t.into_strict().unwrap_err();
        assert!(matches!(err, MeshError::DegenerateGeometry(_)));
    }

    #[test]
    fn short_ring_and_dangling_ids_are_rejected() {
        let verts = [[0.0; 3], [1.0, 0.0, 0.0]];
        assert_eq!(
            tessellate(&ids(2), &verts, &TessellationOptions::default()),
            Err(MeshError::RingTooShort(2))
        );
        assert!(matches!(
            tessellate(&ids(3), &verts, &TessellationOptions::default()),
            Err(MeshError::IdOutOfRange { .. })
        ));
    }
}
