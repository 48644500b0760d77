//! [`AttributeMatrix`]: named typed arrays sharing one tuple count.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use simpl_core::path::validate_name;
use simpl_core::{shape_product, AttributeMatrixType, DataError, Dims, NumericType};

use crate::any_array::{AnyArray, ArrayElement};
use crate::array::DataArray;
use crate::named_seq;

/// An ordered collection of arrays that all describe the same set of
/// tuples (cells, vertices, features, ...).
///
/// The tuple shape's product is the tuple count. Every allocated array has
/// exactly that many tuples; preflight placeholders are exempt.
///
/// The matrix carries a *generation* counter, bumped by every structural
/// change (resize, array removal, array rename). [`ArrayRef`] handles record
/// the generation they were resolved at and fail once it moves on.
///
/// [`ArrayRef`]: crate::ArrayRef
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatrix {
    name: String,
    matrix_type: AttributeMatrixType,
    tuple_dims: Dims,
    #[serde(skip)]
    generation: u64,
    #[serde(with = "named_seq")]
    arrays: IndexMap<String, AnyArray>,
}

fn tuple_count(tuple_dims: &[usize]) -> Result<usize, DataError> {
    if tuple_dims.is_empty() {
        return Err(DataError::InvalidShape {
            reason: "tuple shape is empty".to_string(),
        });
    }
    shape_product(tuple_dims).ok_or_else(|| DataError::InvalidShape {
        reason: format!("tuple shape {tuple_dims:?} overflows"),
    })
}

impl AttributeMatrix {
    /// An empty matrix. Zero extents are allowed (a feature matrix before
    /// any feature is known).
    pub fn new(
        name: impl Into<String>,
        matrix_type: AttributeMatrixType,
        tuple_dims: &[usize],
    ) -> Result<Self, DataError> {
        let name = name.into();
        validate_name(&name)?;
        tuple_count(tuple_dims)?;
        Ok(Self {
            name,
            matrix_type,
            tuple_dims: Dims::from_slice(tuple_dims),
            generation: 0,
            arrays: IndexMap::new(),
        })
    }

    /// Matrix name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Type tag.
    pub fn matrix_type(&self) -> AttributeMatrixType {
        self.matrix_type
    }

    /// Tuple shape.
    pub fn tuple_dims(&self) -> &[usize] {
        &self.tuple_dims
    }

    /// Tuple count (product of the tuple shape).
    pub fn tuples(&self) -> usize {
        shape_product(&self.tuple_dims).unwrap_or(0)
    }

    /// Structural generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn array_path(&self, array: &str) -> String {
        format!("{}/{}", self.name, array)
    }

    fn check_new_name(&self, name: &str) -> Result<(), DataError> {
        validate_name(name)?;
        if self.arrays.contains_key(name) {
            return Err(DataError::AlreadyExists {
                path: self.array_path(name),
            });
        }
        Ok(())
    }

    fn insert_new(&mut self, array: AnyArray) -> &mut AnyArray {
        self.arrays
            .entry(array.name().to_string())
            .or_insert(array)
    }

    /// Allocate a new array with the matrix tuple count.
    pub fn create_array<T: ArrayElement>(
        &mut self,
        name: &str,
        component_dims: &[usize],
        init: T,
    ) -> Result<&mut DataArray<T>, DataError> {
        self.check_new_name(name)?;
        let array = DataArray::new(name, self.tuples(), component_dims, init)?;
        let path = self.array_path(name);
        T::from_any_mut(self.insert_new(array.into())).ok_or(DataError::ArrayNotFound { path })
    }

    /// Add a placeholder array.
    pub fn create_placeholder<T: ArrayElement>(
        &mut self,
        name: &str,
        component_dims: &[usize],
    ) -> Result<&mut DataArray<T>, DataError> {
        self.check_new_name(name)?;
        let array = DataArray::<T>::placeholder(name, component_dims)?;
        let path = self.array_path(name);
        T::from_any_mut(self.insert_new(array.into())).ok_or(DataError::ArrayNotFound { path })
    }

    /// Add an array whose element type is chosen at runtime: a placeholder
    /// if `placeholder` is set, otherwise allocated with the matrix tuple
    /// count and filled with `init`.
    pub fn create_dynamic_array(
        &mut self,
        numeric_type: NumericType,
        name: &str,
        component_dims: &[usize],
        init: f64,
        placeholder: bool,
    ) -> Result<&mut AnyArray, DataError> {
        self.check_new_name(name)?;
        let array = if placeholder {
            AnyArray::placeholder(numeric_type, name, component_dims)?
        } else {
            AnyArray::new_filled(numeric_type, name, self.tuples(), component_dims, init)?
        };
        Ok(self.insert_new(array))
    }

    /// Insert an existing array. Allocated arrays must have the matrix
    /// tuple count.
    pub fn add_array(&mut self, array: AnyArray) -> Result<(), DataError> {
        self.check_new_name(array.name())?;
        if !array.is_placeholder() && array.tuples() != self.tuples() {
            return Err(DataError::TupleCountMismatch {
                path: self.array_path(array.name()),
                expected: self.tuples(),
                actual: array.tuples(),
            });
        }
        self.insert_new(array);
        Ok(())
    }

    /// Change the tuple shape and resize every allocated array to match.
    ///
    /// Arrays are resized in insertion order. If one cannot be reallocated
    /// the walk stops and [`DataError::PartialResize`] lists the arrays
    /// already resized; the rest keep the old tuple count and are reported
    /// by [`validate`](Self::validate). Placeholders stay placeholders.
    pub fn resize_attribute_arrays(&mut self, tuple_dims: &[usize]) -> Result<(), DataError> {
        let tuples = tuple_count(tuple_dims)?;
        self.tuple_dims = Dims::from_slice(tuple_dims);
        self.bump();

        let mut resized = Vec::new();
        for (name, array) in self.arrays.iter_mut() {
            if array.is_placeholder() {
                continue;
            }
            if array.resize_tuples(tuples).is_err() {
                return Err(DataError::PartialResize {
                    matrix: self.name.clone(),
                    resized,
                    failed: name.clone(),
                });
            }
            resized.push(name.clone());
        }
        Ok(())
    }

    /// Array by name.
    pub fn get_array(&self, name: &str) -> Option<&AnyArray> {
        self.arrays.get(name)
    }

    /// Array by name, mutably.
    pub fn get_array_mut(&mut self, name: &str) -> Option<&mut AnyArray> {
        self.arrays.get_mut(name)
    }

    /// Typed array by name.
    pub fn typed_array<T: ArrayElement>(&self, name: &str) -> Result<&DataArray<T>, DataError> {
        let array = self
            .arrays
            .get(name)
            .ok_or_else(|| DataError::ArrayNotFound {
                path: self.array_path(name),
            })?;
        T::from_any(array).ok_or_else(|| DataError::TypeMismatch {
            path: self.array_path(name),
            expected: T::TYPE,
            actual: array.numeric_type(),
        })
    }

    /// Typed array by name, mutably.
    pub fn typed_array_mut<T: ArrayElement>(
        &mut self,
        name: &str,
    ) -> Result<&mut DataArray<T>, DataError> {
        let path = self.array_path(name);
        let array = self
            .arrays
            .get_mut(name)
            .ok_or_else(|| DataError::ArrayNotFound { path: path.clone() })?;
        let actual = array.numeric_type();
        T::from_any_mut(array).ok_or(DataError::TypeMismatch {
            path,
            expected: T::TYPE,
            actual,
        })
    }

    /// Remove an array, keeping the order of the others.
    pub fn remove_array(&mut self, name: &str) -> Option<AnyArray> {
        let removed = self.arrays.shift_remove(name);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Rename an array in place (its position is kept).
    pub fn rename_array(&mut self, old: &str, new: &str) -> Result<(), DataError> {
        if !self.arrays.contains_key(old) {
            return Err(DataError::ArrayNotFound {
                path: self.array_path(old),
            });
        }
        self.check_new_name(new)?;
        if let Some((index, _, mut array)) = self.arrays.shift_remove_full(old) {
            array.set_name(new.to_string());
            let (last, _) = self.arrays.insert_full(new.to_string(), array);
            self.arrays.move_index(last, index);
            self.bump();
        }
        Ok(())
    }

    /// Whether an array with this name exists.
    pub fn contains_array(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// Array names in insertion order.
    pub fn array_names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// Arrays in insertion order.
    pub fn arrays(&self) -> impl Iterator<Item = &AnyArray> {
        self.arrays.values()
    }

    /// Number of arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Whether the matrix holds no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Names of allocated arrays whose tuple count differs from the matrix.
    pub fn mismatched_arrays(&self) -> Vec<&str> {
        let tuples = self.tuples();
        self.arrays
            .values()
            .filter(|a| !a.is_placeholder() && a.tuples() != tuples)
            .map(AnyArray::name)
            .collect()
    }

    /// Check the tuple shape, the names, and that every allocated array has
    /// the matrix tuple count. Reports the first violation.
    pub fn validate(&self) -> Result<(), DataError> {
        validate_name(&self.name)?;
        let tuples = tuple_count(&self.tuple_dims)?;
        for array in self.arrays.values() {
            validate_name(array.name())?;
            if !array.is_placeholder() && array.tuples() != tuples {
                return Err(DataError::TupleCountMismatch {
                    path: self.array_path(array.name()),
                    expected: tuples,
                    actual: array.tuples(),
                });
            }
        }
        Ok(())
    }

    /// The same structure with every array replaced by a placeholder.
    pub fn schema_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            matrix_type: self.matrix_type,
            tuple_dims: self.tuple_dims.clone(),
            generation: 0,
            arrays: self
                .arrays
                .iter()
                .map(|(k, a)| (k.clone(), a.placeholder_like()))
                .collect(),
        }
    }

    /// Bytes held by all arrays.
    pub fn memory_bytes(&self) -> usize {
        self.arrays.values().map(AnyArray::memory_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_matrix(tuples: usize) -> AttributeMatrix {
        AttributeMatrix::new("CellData", AttributeMatrixType::Cell, &[tuples]).unwrap()
    }

    #[test]
    fn create_array_uses_matrix_tuple_count() {
        let mut m = AttributeMatrix::new("M", AttributeMatrixType::Cell, &[2, 5]).unwrap();
        let a = m.create_array::<f32>("X", &[3], 0.0).unwrap();
        assert_eq!(a.tuples(), 10);
        assert_eq!(a.element_count(), 30);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn create_array_rejects_duplicates_and_bad_names() {
        let mut m = cell_matrix(4);
        m.create_array::<i32>("X", &[1], 0).unwrap();
        assert!(matches!(
            m.create_array::<i32>("X", &[1], 0),
            Err(DataError::AlreadyExists { .. })
        ));
        assert!(matches!(
            m.create_array::<i32>("", &[1], 0),
            Err(DataError::InvalidName { .. })
        ));
    }

    #[test]
    fn add_array_checks_tuple_count_but_not_for_placeholders() {
        let mut m = cell_matrix(4);
        let wrong = AnyArray::new_filled(NumericType::Float32, "X", 3, &[1], 0.0).unwrap();
        let err = m.add_array(wrong).unwrap_err();
        assert!(matches!(
            err,
            DataError::TupleCountMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
        let p = AnyArray::placeholder(NumericType::Float32, "P", &[1]).unwrap();
        m.add_array(p).unwrap();
        assert!(m.validate().is_ok());
    }

    #[test]
    fn resize_ten_by_three_to_five() {
        let mut m = cell_matrix(10);
        m.create_array::<f32>("X", &[3], 1.0).unwrap();
        let before = m.generation();
        m.resize_attribute_arrays(&[5]).unwrap();
        assert_eq!(m.tuples(), 5);
        let x = m.typed_array::<f32>("X").unwrap();
        assert_eq!(x.element_count(), 15);
        assert!(m.generation() > before);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn resize_skips_placeholders() {
        let mut m = cell_matrix(10);
        m.create_placeholder::<u8>("P", &[1]).unwrap();
        m.resize_attribute_arrays(&[20]).unwrap();
        let p = m.get_array("P").unwrap();
        assert!(p.is_placeholder());
        assert_eq!(p.tuples(), 0);
    }

    #[test]
    fn partial_resize_reports_resized_and_failed_arrays() {
        let mut m = AttributeMatrix::new("M", AttributeMatrixType::Generic, &[0]).unwrap();
        m.create_array::<u8>("A", &[1], 0).unwrap();
        m.create_array::<u8>("Huge", &[usize::MAX / 4], 0).unwrap();
        m.create_array::<u8>("C", &[1], 0).unwrap();

        let err = m.resize_attribute_arrays(&[8]).unwrap_err();
        assert_eq!(
            err,
            DataError::PartialResize {
                matrix: "M".into(),
                resized: vec!["A".into()],
                failed: "Huge".into(),
            }
        );
        assert_eq!(m.mismatched_arrays(), vec!["Huge", "C"]);
        assert!(matches!(
            m.validate(),
            Err(DataError::TupleCountMismatch { .. })
        ));
    }

    #[test]
    fn typed_lookup_errors() {
        let mut m = cell_matrix(2);
        m.create_array::<i64>("X", &[1], 0).unwrap();
        assert!(m.typed_array::<i64>("X").is_ok());
        assert!(matches!(
            m.typed_array::<f64>("X"),
            Err(DataError::TypeMismatch {
                expected: NumericType::Float64,
                actual: NumericType::Int64,
                ..
            })
        ));
        assert!(matches!(
            m.typed_array_mut::<i64>("Y"),
            Err(DataError::ArrayNotFound { .. })
        ));
    }

    #[test]
    fn rename_keeps_position_and_bumps_generation() {
        let mut m = cell_matrix(1);
        for n in ["A", "B", "C"] {
            m.create_array::<u8>(n, &[1], 0).unwrap();
        }
        let g = m.generation();
        m.rename_array("B", "Bee").unwrap();
        assert_eq!(m.array_names().collect::<Vec<_>>(), vec!["A", "Bee", "C"]);
        assert_eq!(m.get_array("Bee").unwrap().name(), "Bee");
        assert!(m.generation() > g);
        assert!(matches!(
            m.rename_array("A", "C"),
            Err(DataError::AlreadyExists { .. })
        ));
        assert!(matches!(
            m.rename_array("Z", "Q"),
            Err(DataError::ArrayNotFound { .. })
        ));
    }

    #[test]
    fn remove_keeps_order_and_bumps_generation() {
        let mut m = cell_matrix(1);
        for n in ["A", "B", "C"] {
            m.create_array::<u8>(n, &[1], 0).unwrap();
        }
        let g = m.generation();
        assert!(m.remove_array("A").is_some());
        assert!(m.remove_array("A").is_none());
        assert_eq!(m.array_names().collect::<Vec<_>>(), vec!["B", "C"]);
        assert_eq!(m.generation(), g + 1);
    }

    #[test]
    fn creating_arrays_does_not_bump_generation() {
        let mut m = cell_matrix(1);
        m.create_array::<u8>("A", &[1], 0).unwrap();
        m.create_dynamic_array(NumericType::Float64, "B", &[1], 0.0, false)
            .unwrap();
        assert_eq!(m.generation(), 0);
    }

    #[test]
    fn schema_clone_replaces_arrays_with_placeholders() {
        let mut m = cell_matrix(3);
        m.create_array::<f64>("X", &[2], 5.0).unwrap();
        let s = m.schema_clone();
        assert_eq!(s.tuples(), 3);
        let x = s.get_array("X").unwrap();
        assert!(x.is_placeholder());
        assert_eq!(x.numeric_type(), NumericType::Float64);
        assert_eq!(s.memory_bytes(), 0);
    }

    #[test]
    fn serde_round_trip() {
        let mut m = cell_matrix(2);
        m.create_array::<i32>("X", &[1], 3).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: AttributeMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
