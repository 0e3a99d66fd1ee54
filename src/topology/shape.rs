//! Shape classification of polys.

use serde::{Deserialize, Serialize};

/// Recognized poly shapes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PolyShape {
    /// 2D simplex.
    Triangle,
    /// 2D polygon with four corners.
    Quadrilateral,
    /// 2D polygon with `n` corners, `n > 4`.
    Polygon(usize),
    /// 3D simplex: four triangles.
    Tetrahedron,
    /// Six quads.
    Hexahedron,
    /// Two triangles and three quads.
    Prism,
    /// One quad and four triangles.
    Pyramid,
    /// Any other polyhedron.
    Polyhedron,
}

impl PolyShape {
    /// Topological dimension of the shape.
    pub fn dimension(self) -> u8 {
        match self {
            PolyShape::Triangle | PolyShape::Quadrilateral | PolyShape::Polygon(_) => 2,
            PolyShape::Tetrahedron
            | PolyShape::Hexahedron
            | PolyShape::Prism
            | PolyShape::Pyramid
            | PolyShape::Polyhedron => 3,
        }
    }

    /// Shape of a polygon with `n` corners.
    pub fn from_polygon(n: usize) -> Self {
        match n {
            3 => PolyShape::Triangle,
            4 => PolyShape::Quadrilateral,
            n => PolyShape::Polygon(n),
        }
    }

    /// Shape of a polyhedron given the corner count of each of its faces.
    pub fn from_face_sizes(sizes: impl IntoIterator<Item = usize>) -> Self {
        let (mut tris, mut quads, mut other) = (0usize, 0usize, 0usize);
        for n in sizes {
            match n {
                3 => tris += 1,
                4 => quads += 1,
                _ => other += 1,
            }
        }
        match (tris, quads, other) {
            (4, 0, 0) => PolyShape::Tetrahedron,
            (0, 6, 0) => PolyShape::Hexahedron,
            (2, 3, 0) => PolyShape::Prism,
            (4, 1, 0) => PolyShape::Pyramid,
            _ => PolyShape::Polyhedron,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(PolyShape::from_polygon(3), PolyShape::Triangle);
        assert_eq!(PolyShape::from_polygon(6), PolyShape::Polygon(6));
        assert_eq!(PolyShape::from_face_sizes([4; 6]), PolyShape::Hexahedron);
        assert_eq!(PolyShape::from_face_sizes([3, 4, 4, 4, 3]), PolyShape::Prism);
        assert_eq!(PolyShape::from_face_sizes([4, 3, 3, 3, 3]), PolyShape::Pyramid);
        assert_eq!(PolyShape::from_face_sizes([5, 5, 4, 4, 4, 4, 4]), PolyShape::Polyhedron);
        assert_eq!(PolyShape::Polygon(7).dimension(), 2);
        assert_eq!(PolyShape::Prism.dimension(), 3);
    }
}
