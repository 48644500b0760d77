//! [`AnyArray`]: a typed array whose element type is known only at runtime.

use serde::{Deserialize, Serialize};
use simpl_core::{DataError, Element, NumericType};

use crate::array::DataArray;

/// A [`DataArray`] of any supported element type; the unit an attribute
/// matrix stores.
///
/// Serializes externally tagged by element type name:
/// `{"float32": { "name": ..., ... }}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnyArray {
    /// `i8` elements.
    Int8(DataArray<i8>),
    /// `u8` elements.
    UInt8(DataArray<u8>),
    /// `i16` elements.
    Int16(DataArray<i16>),
    /// `u16` elements.
    UInt16(DataArray<u16>),
    /// `i32` elements.
    Int32(DataArray<i32>),
    /// `u32` elements.
    UInt32(DataArray<u32>),
    /// `i64` elements.
    Int64(DataArray<i64>),
    /// `u64` elements.
    UInt64(DataArray<u64>),
    /// `f32` elements.
    Float32(DataArray<f32>),
    /// `f64` elements.
    Float64(DataArray<f64>),
    /// `bool` elements.
    Bool(DataArray<bool>),
}

/// Apply `$body` to the inner `DataArray<_>` bound as `$a`, whatever its
/// element type.
macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            AnyArray::Int8($a) => $body,
            AnyArray::UInt8($a) => $body,
            AnyArray::Int16($a) => $body,
            AnyArray::UInt16($a) => $body,
            AnyArray::Int32($a) => $body,
            AnyArray::UInt32($a) => $body,
            AnyArray::Int64($a) => $body,
            AnyArray::UInt64($a) => $body,
            AnyArray::Float32($a) => $body,
            AnyArray::Float64($a) => $body,
            AnyArray::Bool($a) => $body,
        }
    };
}

/// Evaluate `$body` with `$t` bound to the Rust type for `$ty`.
macro_rules! with_type {
    ($ty:expr, $t:ident => $body:expr) => {
        match $ty {
            NumericType::Int8 => {
                type $t = i8;
                $body
            }
            NumericType::UInt8 => {
                type $t = u8;
                $body
            }
            NumericType::Int16 => {
                type $t = i16;
                $body
            }
            NumericType::UInt16 => {
                type $t = u16;
                $body
            }
            NumericType::Int32 => {
                type $t = i32;
                $body
            }
            NumericType::UInt32 => {
                type $t = u32;
                $body
            }
            NumericType::Int64 => {
                type $t = i64;
                $body
            }
            NumericType::UInt64 => {
                type $t = u64;
                $body
            }
            NumericType::Float32 => {
                type $t = f32;
                $body
            }
            NumericType::Float64 => {
                type $t = f64;
                $body
            }
            NumericType::Bool => {
                type $t = bool;
                $body
            }
        }
    };
}

/// An [`Element`] that has a matching [`AnyArray`] variant.
pub trait ArrayElement: Element {
    /// Wrap a typed array.
    fn into_any(array: DataArray<Self>) -> AnyArray;

    /// Borrow the typed array if `array` stores `Self`.
    fn from_any(array: &AnyArray) -> Option<&DataArray<Self>>;

    /// Mutably borrow the typed array if `array` stores `Self`.
    fn from_any_mut(array: &mut AnyArray) -> Option<&mut DataArray<Self>>;
}

macro_rules! impl_array_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                fn into_any(array: DataArray<Self>) -> AnyArray {
                    AnyArray::$variant(array)
                }

                fn from_any(array: &AnyArray) -> Option<&DataArray<Self>> {
                    match array {
                        AnyArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }

                fn from_any_mut(array: &mut AnyArray) -> Option<&mut DataArray<Self>> {
                    match array {
                        AnyArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_array_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
}

impl<T: ArrayElement> From<DataArray<T>> for AnyArray {
    fn from(array: DataArray<T>) -> Self {
        T::into_any(array)
    }
}

impl AnyArray {
    /// Allocate an array of `numeric_type` filled with `init` (converted
    /// from `f64`).
    pub fn new_filled(
        numeric_type: NumericType,
        name: impl Into<String>,
        tuples: usize,
        component_dims: &[usize],
        init: f64,
    ) -> Result<Self, DataError> {
        let name = name.into();
        with_type!(numeric_type, T => {
            DataArray::<T>::new(name, tuples, component_dims, T::from_f64(init)).map(Self::from)
        })
    }

    /// A zero-tuple placeholder of `numeric_type`.
    pub fn placeholder(
        numeric_type: NumericType,
        name: impl Into<String>,
        component_dims: &[usize],
    ) -> Result<Self, DataError> {
        let name = name.into();
        with_type!(numeric_type, T => {
            DataArray::<T>::placeholder(name, component_dims).map(Self::from)
        })
    }

    /// Runtime element type tag.
    pub fn numeric_type(&self) -> NumericType {
        dispatch!(self, a => a.numeric_type())
    }

    /// Array name.
    pub fn name(&self) -> &str {
        dispatch!(self, a => a.name())
    }

    pub(crate) fn set_name(&mut self, name: String) {
        dispatch!(self, a => a.set_name(name))
    }

    /// The same array under a new name. The name is not validated here;
    /// matrices validate names on insertion.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.set_name(name.into());
        self
    }

    /// Component shape.
    pub fn component_dims(&self) -> &[usize] {
        dispatch!(self, a => a.component_dims())
    }

    /// Values per tuple.
    pub fn components(&self) -> usize {
        dispatch!(self, a => a.components())
    }

    /// Number of tuples.
    pub fn tuples(&self) -> usize {
        dispatch!(self, a => a.tuples())
    }

    /// Total number of stored values.
    pub fn element_count(&self) -> usize {
        dispatch!(self, a => a.element_count())
    }

    /// Whether this is a preflight placeholder.
    pub fn is_placeholder(&self) -> bool {
        dispatch!(self, a => a.is_placeholder())
    }

    /// Bytes held by the buffer.
    pub fn memory_bytes(&self) -> usize {
        dispatch!(self, a => a.memory_bytes())
    }

    /// Grow or shrink to `tuples` tuples. See [`DataArray::resize_tuples`].
    pub fn resize_tuples(&mut self, tuples: usize) -> Result<(), DataError> {
        dispatch!(self, a => a.resize_tuples(tuples))
    }

    /// A placeholder with this array's element type, name, and component
    /// shape.
    pub fn placeholder_like(&self) -> Self {
        dispatch!(self, a => Self::from(a.placeholder_like()))
    }

    /// Borrow as `DataArray<T>` if the element type matches.
    pub fn downcast_ref<T: ArrayElement>(&self) -> Option<&DataArray<T>> {
        T::from_any(self)
    }

    /// Mutably borrow as `DataArray<T>` if the element type matches.
    pub fn downcast_mut<T: ArrayElement>(&mut self) -> Option<&mut DataArray<T>> {
        T::from_any_mut(self)
    }

    /// Copy every value out, widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        dispatch!(self, a => a.as_slice().iter().map(|v| v.to_f64()).collect())
    }

    /// Replace every value `v` with `f(v)`, computed in `f64` and converted
    /// back to the element type (integers saturate).
    pub fn map_in_place_f64(&mut self, mut f: impl FnMut(f64) -> f64) {
        dispatch!(self, a => {
            for v in a.as_mut_slice() {
                *v = Element::from_f64(f(v.to_f64()));
            }
        })
    }

    /// Set every value from an `f64`.
    pub fn fill_f64(&mut self, value: f64) {
        dispatch!(self, a => a.fill(Element::from_f64(value)))
    }

    /// Copy every value from `src`. Returns `false`, leaving `self`
    /// unchanged, unless both arrays have the same element type and
    /// element count.
    pub fn copy_values_from(&mut self, src: &AnyArray) -> bool {
        dispatch!(self, a => copy_values(a, src))
    }
}

fn copy_values<T: ArrayElement>(dst: &mut DataArray<T>, src: &AnyArray) -> bool {
    match src.downcast_ref::<T>() {
        Some(s) if s.element_count() == dst.element_count() => {
            dst.as_mut_slice().copy_from_slice(s.as_slice());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_filled_uses_runtime_type() {
        for t in NumericType::ALL {
            let a = AnyArray::new_filled(t, "X", 3, &[2], 1.0).unwrap();
            assert_eq!(a.numeric_type(), t);
            assert_eq!(a.element_count(), 6);
            assert_eq!(a.to_f64_vec(), vec![1.0; 6]);
            assert_eq!(a.memory_bytes(), 6 * t.size_of());
        }
    }

    #[test]
    fn downcast_checks_element_type() {
        let mut a = AnyArray::new_filled(NumericType::Float32, "X", 2, &[1], 0.5).unwrap();
        assert!(a.downcast_ref::<f64>().is_none());
        assert_eq!(a.downcast_ref::<f32>().unwrap().as_slice(), &[0.5, 0.5]);
        a.downcast_mut::<f32>().unwrap().fill(2.0);
        assert_eq!(a.to_f64_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn placeholder_like_keeps_description() {
        let a = AnyArray::new_filled(NumericType::UInt16, "X", 5, &[3], 4.0).unwrap();
        let p = a.placeholder_like();
        assert!(p.is_placeholder());
        assert_eq!(p.numeric_type(), NumericType::UInt16);
        assert_eq!(p.component_dims(), &[3]);
        assert_eq!(p.tuples(), 0);
        assert_eq!(p.name(), "X");
    }

    #[test]
    fn map_in_place_saturates_integers() {
        let mut a = AnyArray::new_filled(NumericType::UInt8, "X", 2, &[1], 100.0).unwrap();
        a.map_in_place_f64(|v| v * 3.0);
        assert_eq!(a.to_f64_vec(), vec![255.0, 255.0]);
    }

    #[test]
    fn renamed_changes_only_the_name() {
        let a = AnyArray::new_filled(NumericType::Int32, "X", 2, &[1], 7.0).unwrap();
        let b = a.clone().renamed("Y");
        assert_eq!(b.name(), "Y");
        assert_eq!(b.to_f64_vec(), a.to_f64_vec());
    }

    #[test]
    fn serde_is_tagged_by_element_type() {
        let a = AnyArray::new_filled(NumericType::Int8, "X", 1, &[1], 3.0).unwrap();
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("int8").is_some());
        let back: AnyArray = serde_json::from_value(json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn copy_values_requires_matching_type_and_size() {
        let src = AnyArray::new_filled(NumericType::Float32, "X", 4, &[1], 2.5).unwrap();
        let mut dst = AnyArray::new_filled(NumericType::Float32, "Y", 4, &[1], 0.0).unwrap();
        assert!(dst.copy_values_from(&src));
        assert_eq!(dst.to_f64_vec(), vec![2.5; 4]);

        let mut other = AnyArray::new_filled(NumericType::Int32, "Z", 4, &[1], 0.0).unwrap();
        assert!(!other.copy_values_from(&src));
        let mut short = AnyArray::new_filled(NumericType::Float32, "S", 3, &[1], 0.0).unwrap();
        assert!(!short.copy_values_from(&src));
        assert_eq!(short.to_f64_vec(), vec![0.0; 3]);
    }
}
