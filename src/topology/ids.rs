//! Dense entity ids: strong, zero-cost handles for vertices, edges, faces and polys.
//!
//! Every entity of a mesh lives in a kind-specific array and is addressed by
//! its index in that array. The id newtypes wrap a `u32` so the four kinds
//! cannot be mixed up, while staying as cheap as the raw integer.
//!
//! Ids are *dense*: for a mesh with `n` entities of one kind the valid ids
//! are exactly `0..n`. Removing an entity moves the last entity of the same
//! kind into the freed slot, so an id held across a removal may refer to a
//! different entity afterwards.

use std::fmt;

/// The four entity kinds stored by a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Vertex,
    Edge,
    Face,
    Poly,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
            EntityKind::Face => "face",
            EntityKind::Poly => "poly",
        };
        f.write_str(name)
    }
}

/// Common behaviour of the dense id newtypes.
pub trait DenseId: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    /// Kind of entity this id addresses.
    const KIND: EntityKind;

    /// Wraps an array index.
    fn from_index(index: usize) -> Self;

    /// Returns the array index.
    fn index(self) -> usize;
}

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from an array index.
            ///
            /// # Panics
            ///
            /// Panics if `index` does not fit in a `u32`.
            #[inline]
            pub fn new(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!(concat!(stringify!($name), " index {} exceeds u32"), index),
                }
            }

            /// Returns the array index of this id.
            #[inline]
            pub const fn idx(self) -> usize {
                self.0 as usize
            }

            /// Returns the raw `u32` value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl DenseId for $name {
            const KIND: EntityKind = $kind;

            #[inline]
            fn from_index(index: usize) -> Self {
                $name::new(index)
            }

            #[inline]
            fn index(self) -> usize {
                self.idx()
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(raw: u32) -> Self {
                $name(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        /// Prints only the raw integer.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

dense_id!(
    /// Id of a vertex.
    VertId,
    EntityKind::Vertex
);
dense_id!(
    /// Id of an edge (unordered vertex pair).
    EdgeId,
    EntityKind::Edge
);
dense_id!(
    /// Id of a face of a polyhedral mesh.
    FaceId,
    EntityKind::Face
);
dense_id!(
    /// Id of a poly: a polygon in a surface mesh, a polyhedron in a volume mesh.
    PolyId,
    EntityKind::Poly
);

/// Sorted copy of a vertex pair, used as the lookup key of an edge.
#[inline]
pub fn canonical_pair(a: VertId, b: VertId) -> (VertId, VertId) {
    if a <= b { (a, b) } else { (b, a) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_idx() {
        let v = VertId::new(42);
        assert_eq!(v.idx(), 42);
        assert_eq!(v.get(), 42);
        assert_eq!(VertId::from_index(7), VertId::from(7u32));
    }

    #[test]
    fn debug_and_display() {
        let e = EdgeId::new(7);
        assert_eq!(format!("{:?}", e), "EdgeId(7)");
        assert_eq!(format!("{}", e), "7");
        assert_eq!(format!("{}", EntityKind::Face), "face");
    }

    #[test]
    fn canonical_pair_sorts() {
        let (a, b) = (VertId::new(5), VertId::new(2));
        assert_eq!(canonical_pair(a, b), (b, a));
        assert_eq!(canonical_pair(b, a), (b, a));
    }

    #[test]
    fn kinds_are_distinct() {
        assert_eq!(VertId::KIND, EntityKind::Vertex);
        assert_eq!(EdgeId::KIND, EntityKind::Edge);
        assert_eq!(FaceId::KIND, EntityKind::Face);
        assert_eq!(PolyId::KIND, EntityKind::Poly);
    }

    #[test]
    fn json_is_transparent() {
        let p = PolyId::new(123);
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, "123");
        let back: PolyId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
