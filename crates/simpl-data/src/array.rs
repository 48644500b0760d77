//! [`DataArray`]: a contiguous buffer of one primitive element type.

use serde::{Deserialize, Serialize};
use simpl_core::path::validate_name;
use simpl_core::{shape_product, DataError, Dims, Element, NumericType};

/// A homogeneous buffer of `T` organised as tuples of components.
///
/// The component shape gives the number of values per tuple (its product):
/// `[1]` for scalars, `[3]` for vectors, `[3, 3]` for tensors. The buffer
/// length is always `tuples * components`.
///
/// Allocation is fallible: creating or growing an array reserves its
/// storage with `try_reserve_exact` and reports
/// [`DataError::Allocation`] instead of aborting the process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayRepr<T>", bound(deserialize = "T: Element"))]
pub struct DataArray<T: Element> {
    name: String,
    component_dims: Dims,
    tuples: usize,
    init_value: T,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    placeholder: bool,
    data: Vec<T>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Element"))]
struct ArrayRepr<T: Element> {
    name: String,
    component_dims: Dims,
    tuples: usize,
    init_value: T,
    #[serde(default)]
    placeholder: bool,
    data: Vec<T>,
}

impl<T: Element> TryFrom<ArrayRepr<T>> for DataArray<T> {
    type Error = DataError;

    fn try_from(repr: ArrayRepr<T>) -> Result<Self, Self::Error> {
        validate_name(&repr.name)?;
        let components = components_of(&repr.component_dims)?;
        let expected = if repr.placeholder {
            0
        } else {
            repr.tuples
                .checked_mul(components)
                .ok_or_else(|| DataError::Allocation {
                    path: repr.name.clone(),
                    elements: None,
                })?
        };
        if repr.data.len() != expected || (repr.placeholder && repr.tuples != 0) {
            return Err(DataError::TupleCountMismatch {
                path: repr.name,
                expected,
                actual: repr.data.len(),
            });
        }
        Ok(Self {
            name: repr.name,
            component_dims: repr.component_dims,
            tuples: repr.tuples,
            init_value: repr.init_value,
            placeholder: repr.placeholder,
            data: repr.data,
        })
    }
}

/// Number of components per tuple for a component shape.
///
/// The shape must be non-empty with no zero extent.
pub(crate) fn components_of(component_dims: &[usize]) -> Result<usize, DataError> {
    if component_dims.is_empty() || component_dims.contains(&0) {
        return Err(DataError::InvalidShape {
            reason: format!("component shape {component_dims:?} must be non-empty and non-zero"),
        });
    }
    shape_product(component_dims).ok_or_else(|| DataError::InvalidShape {
        reason: format!("component shape {component_dims:?} overflows"),
    })
}

fn allocate<T: Element>(name: &str, len: usize, value: T) -> Result<Vec<T>, DataError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| DataError::Allocation {
            path: name.to_string(),
            elements: Some(len),
        })?;
    data.resize(len, value);
    Ok(data)
}

impl<T: Element> DataArray<T> {
    /// Allocate an array of `tuples` tuples, every value set to `init`.
    ///
    /// Fails with [`DataError::InvalidName`], [`DataError::InvalidShape`]
    /// for an empty or zero component shape, or [`DataError::Allocation`]
    /// when the buffer size overflows or cannot be reserved.
    pub fn new(
        name: impl Into<String>,
        tuples: usize,
        component_dims: &[usize],
        init: T,
    ) -> Result<Self, DataError> {
        let name = name.into();
        validate_name(&name)?;
        let components = components_of(component_dims)?;
        let len = tuples
            .checked_mul(components)
            .ok_or_else(|| DataError::Allocation {
                path: name.clone(),
                elements: None,
            })?;
        let data = allocate(&name, len, init)?;
        Ok(Self {
            name,
            component_dims: Dims::from_slice(component_dims),
            tuples,
            init_value: init,
            placeholder: false,
            data,
        })
    }

    /// A zero-tuple, unallocated array describing the element type and
    /// component shape only.
    pub fn placeholder(name: impl Into<String>, component_dims: &[usize]) -> Result<Self, DataError> {
        let name = name.into();
        validate_name(&name)?;
        components_of(component_dims)?;
        Ok(Self {
            name,
            component_dims: Dims::from_slice(component_dims),
            tuples: 0,
            init_value: T::zero(),
            placeholder: true,
            data: Vec::new(),
        })
    }

    /// Wrap existing values. `data.len()` must be a multiple of the number
    /// of components.
    pub fn from_vec(
        name: impl Into<String>,
        component_dims: &[usize],
        data: Vec<T>,
    ) -> Result<Self, DataError> {
        let name = name.into();
        validate_name(&name)?;
        let components = components_of(component_dims)?;
        if data.len() % components != 0 {
            return Err(DataError::InvalidShape {
                reason: format!(
                    "{} values do not divide into tuples of {components} components",
                    data.len()
                ),
            });
        }
        Ok(Self {
            name,
            component_dims: Dims::from_slice(component_dims),
            tuples: data.len() / components,
            init_value: T::zero(),
            placeholder: false,
            data,
        })
    }

    /// Array name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Runtime element type tag.
    pub fn numeric_type(&self) -> NumericType {
        T::TYPE
    }

    /// Component shape.
    pub fn component_dims(&self) -> &[usize] {
        &self.component_dims
    }

    /// Values per tuple.
    pub fn components(&self) -> usize {
        shape_product(&self.component_dims).unwrap_or(0)
    }

    /// Number of tuples.
    pub fn tuples(&self) -> usize {
        self.tuples
    }

    /// Total number of stored values.
    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    /// Whether no values are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether this is a preflight placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Value used to fill newly grown tuples.
    pub fn init_value(&self) -> T {
        self.init_value
    }

    /// Change the fill value used by later growth.
    pub fn set_init_value(&mut self, value: T) {
        self.init_value = value;
    }

    /// Bytes held by the buffer.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * T::TYPE.size_of()
    }

    /// All values, tuple-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// All values, tuple-major, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the array and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Components of tuple `i`.
    pub fn tuple(&self, i: usize) -> Option<&[T]> {
        let c = self.components();
        self.data.get(i.checked_mul(c)?..i.checked_add(1)?.checked_mul(c)?)
    }

    /// Components of tuple `i`, mutably.
    pub fn tuple_mut(&mut self, i: usize) -> Option<&mut [T]> {
        let c = self.components();
        self.data.get_mut(i.checked_mul(c)?..i.checked_add(1)?.checked_mul(c)?)
    }

    /// Component `comp` of tuple `tuple`.
    pub fn value(&self, tuple: usize, comp: usize) -> Option<T> {
        if comp >= self.components() {
            return None;
        }
        self.tuple(tuple).map(|t| t[comp])
    }

    /// Set component `comp` of tuple `tuple`. Returns `false` when out of
    /// range.
    pub fn set_value(&mut self, tuple: usize, comp: usize, value: T) -> bool {
        if comp >= self.components() {
            return false;
        }
        match self.tuple_mut(tuple) {
            Some(t) => {
                t[comp] = value;
                true
            }
            None => false,
        }
    }

    /// Set every value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Grow or shrink to `tuples` tuples.
    ///
    /// New tuples are filled with [`init_value`](Self::init_value). A
    /// placeholder becomes a real, allocated array. On failure the array
    /// is left unchanged.
    pub fn resize_tuples(&mut self, tuples: usize) -> Result<(), DataError> {
        let components = components_of(&self.component_dims)?;
        let len = tuples
            .checked_mul(components)
            .ok_or_else(|| DataError::Allocation {
                path: self.name.clone(),
                elements: None,
            })?;
        if len > self.data.len() {
            self.data
                .try_reserve_exact(len - self.data.len())
                .map_err(|_| DataError::Allocation {
                    path: self.name.clone(),
                    elements: Some(len),
                })?;
        }
        self.data.resize(len, self.init_value);
        self.tuples = tuples;
        self.placeholder = false;
        Ok(())
    }

    /// A placeholder with this array's name and component shape.
    pub fn placeholder_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            component_dims: self.component_dims.clone(),
            tuples: 0,
            init_value: self.init_value,
            placeholder: true,
            data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_fills_with_init_value() {
        let a = DataArray::<f32>::new("X", 4, &[3], 1.5).unwrap();
        assert_eq!(a.tuples(), 4);
        assert_eq!(a.components(), 3);
        assert_eq!(a.element_count(), 12);
        assert!(a.as_slice().iter().all(|&v| v == 1.5));
        assert_eq!(a.memory_bytes(), 48);
        assert!(!a.is_placeholder());
    }

    #[test]
    fn placeholder_holds_no_data() {
        let p = DataArray::<i32>::placeholder("P", &[3, 3]).unwrap();
        assert!(p.is_placeholder());
        assert_eq!(p.tuples(), 0);
        assert_eq!(p.components(), 9);
        assert!(p.is_empty());
    }

    #[test]
    fn rejects_bad_component_shape() {
        assert!(matches!(
            DataArray::<u8>::new("X", 1, &[], 0),
            Err(DataError::InvalidShape { .. })
        ));
        assert!(matches!(
            DataArray::<u8>::new("X", 1, &[3, 0], 0),
            Err(DataError::InvalidShape { .. })
        ));
    }

    #[test]
    fn rejects_bad_name() {
        assert!(matches!(
            DataArray::<u8>::new("a/b", 1, &[1], 0),
            Err(DataError::InvalidName { .. })
        ));
    }

    #[test]
    fn overflowing_size_is_allocation_error() {
        let err = DataArray::<f64>::new("X", usize::MAX, &[3], 0.0).unwrap_err();
        assert!(matches!(err, DataError::Allocation { elements: None, .. }));
    }

    #[test]
    fn resize_ten_by_three_to_five_gives_fifteen_values() {
        let mut a = DataArray::<f32>::new("X", 10, &[3], 0.0).unwrap();
        a.resize_tuples(5).unwrap();
        assert_eq!(a.tuples(), 5);
        assert_eq!(a.element_count(), 15);
    }

    #[test]
    fn grow_fills_new_tuples_with_init_value() {
        let mut a = DataArray::<i16>::new("X", 2, &[1], 7).unwrap();
        a.fill(1);
        a.resize_tuples(4).unwrap();
        assert_eq!(a.as_slice(), &[1, 1, 7, 7]);
    }

    #[test]
    fn failed_resize_leaves_array_unchanged() {
        let mut a = DataArray::<f64>::new("X", 2, &[3], 1.0).unwrap();
        assert!(a.resize_tuples(usize::MAX / 2).is_err());
        assert_eq!(a.tuples(), 2);
        assert_eq!(a.element_count(), 6);
    }

    #[test]
    fn resizing_a_placeholder_allocates_it() {
        let mut p = DataArray::<u8>::placeholder("P", &[2]).unwrap();
        p.resize_tuples(3).unwrap();
        assert!(!p.is_placeholder());
        assert_eq!(p.element_count(), 6);
    }

    #[test]
    fn tuple_and_value_access() {
        let mut a = DataArray::<i32>::from_vec("X", &[2], vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(a.tuples(), 3);
        assert_eq!(a.tuple(1), Some(&[3, 4][..]));
        assert_eq!(a.value(2, 1), Some(6));
        assert_eq!(a.value(2, 2), None);
        assert_eq!(a.tuple(3), None);
        assert!(a.set_value(0, 1, 20));
        assert!(!a.set_value(9, 0, 1));
        assert_eq!(a.tuple_mut(0).unwrap(), &mut [1, 20][..]);
    }

    #[test]
    fn from_vec_rejects_ragged_data() {
        assert!(DataArray::<i32>::from_vec("X", &[3], vec![1, 2, 3, 4]).is_err());
    }

    #[test]
    fn serde_round_trip_checks_length() {
        let a = DataArray::<u16>::new("X", 2, &[2], 9).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        let back: DataArray<u16> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        let bad = json.replace("[9,9,9,9]", "[9,9,9]");
        assert!(serde_json::from_str::<DataArray<u16>>(&bad).is_err());
    }

    proptest! {
        #[test]
        fn length_is_tuples_times_components(
            tuples in 0usize..64,
            comps in prop::collection::vec(1usize..4, 1..3),
            target in 0usize..64,
        ) {
            let mut a = DataArray::<f32>::new("X", tuples, &comps, 0.0).unwrap();
            let c: usize = comps.iter().product();
            prop_assert_eq!(a.element_count(), tuples * c);
            a.resize_tuples(target).unwrap();
            prop_assert_eq!(a.element_count(), target * c);
            prop_assert_eq!(a.tuples(), target);
        }
    }
}
