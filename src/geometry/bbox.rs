//! Axis-aligned bounding box of the vertex cloud.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. An empty box has `min > max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// A box containing nothing.
    pub const fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    /// Tight box around `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 3]>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.extend(*p);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn extend(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Length of the main diagonal, `0.0` for an empty box.
    pub fn diag(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        super::metrics::distance(self.min, self.max)
    }

    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_and_diag() {
        let mut bb = BoundingBox::empty();
        assert!(bb.is_empty());
        assert_eq!(bb.diag(), 0.0);
        bb.extend([0.0, 0.0, 0.0]);
        bb.extend([1.0, 2.0, 2.0]);
        assert!(!bb.is_empty());
        assert!((bb.diag() - 3.0).abs() < 1e-12);
        assert!(bb.contains([0.5, 1.0, 1.0]));
        assert!(!bb.contains([2.0, 0.0, 0.0]));
        assert_eq!(bb.center(), [0.5, 1.0, 1.0]);
    }
}
