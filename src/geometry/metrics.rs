//! Geometry measures for mesh entities.
//!
//! Points are plain `[f64; 3]`. Polygon measures use Newell's method so they
//! stay meaningful for slightly non-planar rings, and volume measures use the
//! divergence theorem over outward-oriented triangles.

pub(crate) const EPS: f64 = 1e-12;

#[inline]
pub(crate) fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub(crate) fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` when `a` is (numerically) zero.
#[inline]
pub(crate) fn normalize(a: [f64; 3]) -> Option<[f64; 3]> {
    let n = norm(a);
    if n <= EPS { None } else { Some(scale(a, 1.0 / n)) }
}

/// Distance between two points.
#[inline]
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(sub(a, b))
}

/// Area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    0.5 * norm(cross(sub(b, a), sub(c, a)))
}

/// Area-weighted (non-normalized) normal of triangle `(a, b, c)`.
#[inline]
pub(crate) fn triangle_cross(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    cross(sub(b, a), sub(c, a))
}

/// Newell normal of a closed ring. Its length is twice the polygon area for
/// planar input; the direction follows the right-hand rule on the ring order.
pub fn newell_normal(ring: &[[f64; 3]]) -> [f64; 3] {
    let mut n = [0.0; 3];
    let len = ring.len();
    for i in 0..len {
        let p = ring[i];
        let q = ring[(i + 1) % len];
        n[0] += (p[1] - q[1]) * (p[2] + q[2]);
        n[1] += (p[2] - q[2]) * (p[0] + q[0]);
        n[2] += (p[0] - q[0]) * (p[1] + q[1]);
    }
    n
}

/// Area of a planar polygon ring (projected area for non-planar rings).
pub fn polygon_area(ring: &[[f64; 3]]) -> f64 {
    0.5 * norm(newell_normal(ring))
}

/// Arithmetic mean of a set of points. Empty input yields the origin.
pub fn centroid(points: impl IntoIterator<Item = [f64; 3]>) -> [f64; 3] {
    let mut acc = [0.0; 3];
    let mut n = 0usize;
    for p in points {
        acc = add(acc, p);
        n += 1;
    }
    if n == 0 {
        acc
    } else {
        scale(acc, 1.0 / n as f64)
    }
}

/// Signed volume of the tetrahedron `(a, b, c, d)`; positive when `d` lies on
/// the side of `(a, b, c)` that the right-hand normal points away from.
#[inline]
pub fn signed_tet_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    dot(sub(a, d), cross(sub(b, d), sub(c, d))) / 6.0
}

/// Signed volume enclosed by outward-oriented triangles (divergence theorem).
pub fn enclosed_volume(triangles: impl IntoIterator<Item = [[f64; 3]; 3]>) -> f64 {
    triangles
        .into_iter()
        .map(|[a, b, c]| dot(a, cross(b, c)))
        .sum::<f64>()
        / 6.0
}
