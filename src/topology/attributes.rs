//! Per-entity attribute blocks.
//!
//! A mesh carries one attribute value per vertex, edge, face and poly, stored
//! in arrays parallel to the entity arrays and moved together with them on
//! `switch_id` / removal. The topology engine never interprets the values;
//! consumers (visualization, algorithms) do.
//!
//! The attribute types are chosen once per mesh through an
//! [`AttributeSchema`]. [`StdAttributes`] provides the usual color / label /
//! flags / quality blocks.

use std::fmt::Debug;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Attribute types attached to each entity kind.
pub trait AttributeSchema: Clone + Debug + Default {
    type Vert: Clone + Debug + Default;
    type Edge: Clone + Debug + Default;
    type Face: Clone + Debug + Default;
    type Poly: Clone + Debug + Default;
}

/// Attributes carrying an integer label.
pub trait Labeled {
    fn label(&self) -> i32;
    fn set_label(&mut self, label: i32);
}

/// Attributes carrying a boolean mark.
pub trait Marked {
    fn marked(&self) -> bool;
    fn set_marked(&mut self, marked: bool);
}

/// RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Standard vertex attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertAttr {
    pub color: Color,
    pub label: i32,
    pub marked: bool,
    pub flags: u32,
    /// Texture / parametric coordinates.
    pub uvw: [f64; 3],
}

/// Standard edge attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttr {
    pub color: Color,
    pub label: i32,
    pub marked: bool,
    pub flags: u32,
}

/// Standard face attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceAttr {
    pub color: Color,
    pub label: i32,
    pub marked: bool,
    pub flags: u32,
}

/// Standard poly attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyAttr {
    pub color: Color,
    pub label: i32,
    pub marked: bool,
    pub flags: u32,
    pub quality: f64,
}

/// The default schema: [`VertAttr`], [`EdgeAttr`], [`FaceAttr`], [`PolyAttr`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdAttributes;

impl AttributeSchema for StdAttributes {
    type Vert = VertAttr;
    type Edge = EdgeAttr;
    type Face = FaceAttr;
    type Poly = PolyAttr;
}

/// Schema for consumers that need no attributes at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoAttributes;

impl AttributeSchema for NoAttributes {
    type Vert = ();
    type Edge = ();
    type Face = ();
    type Poly = ();
}

macro_rules! impl_label_mark {
    ($($ty:ty),*) => {$(
        impl Labeled for $ty {
            #[inline]
            fn label(&self) -> i32 {
                self.label
            }
            #[inline]
            fn set_label(&mut self, label: i32) {
                self.label = label;
            }
        }

        impl Marked for $ty {
            #[inline]
            fn marked(&self) -> bool {
                self.marked
            }
            #[inline]
            fn set_marked(&mut self, marked: bool) {
                self.marked = marked;
            }
        }
    )*};
}

impl_label_mark!(VertAttr, EdgeAttr, FaceAttr, PolyAttr);

/// Ids whose attribute carries `label`, in ascending order.
pub(crate) fn ids_with_label<T: Labeled>(attrs: &[T], label: i32) -> Vec<usize> {
    attrs
        .iter()
        .enumerate()
        .filter_map(|(i, a)| (a.label() == label).then_some(i))
        .collect()
}

/// Distinct labels present in `attrs`, sorted ascending.
pub(crate) fn distinct_labels<T: Labeled>(attrs: &[T]) -> Vec<i32> {
    attrs.iter().map(Labeled::label).sorted_unstable().dedup().collect()
}
