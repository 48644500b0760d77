//! [`DataContainerArray`]: the root of the data structure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use simpl_core::path::validate_name;
use simpl_core::{AttributeMatrixType, DataArrayPath, DataError, NumericType};

use crate::any_array::{AnyArray, ArrayElement};
use crate::array::DataArray;
use crate::container::DataContainer;
use crate::geometry::GeometryType;
use crate::handle::ArrayRef;
use crate::matrix::AttributeMatrix;
use crate::named_seq;
use crate::schema::DataStructureSchema;

/// The ordered set of data containers a pipeline operates on.
///
/// This is the single mutable state threaded through every filter call.
/// Everything below it is addressed by [`DataArrayPath`]; path-based
/// lookups report the full path in their errors.
///
/// The `create_non_prereq_*` operations validate before creating and are
/// used the same way in preflight (on a schema-only array) and in execute
/// (on the real one).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataContainerArray {
    #[serde(with = "named_seq")]
    containers: IndexMap<String, DataContainer>,
}

impl DataContainerArray {
    /// An empty container array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether there are no containers.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Container names in insertion order.
    pub fn container_names(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Containers in insertion order.
    pub fn containers(&self) -> impl Iterator<Item = &DataContainer> {
        self.containers.values()
    }

    /// Whether a container with this name exists.
    pub fn contains_data_container(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    // ── Creation ───────────────────────────────────────────────────

    /// Create an empty container.
    ///
    /// Fails with [`DataError::AlreadyExists`] or [`DataError::InvalidName`].
    pub fn create_non_prereq_data_container(
        &mut self,
        name: &str,
    ) -> Result<&mut DataContainer, DataError> {
        self.add_data_container(DataContainer::new(name)?)?;
        self.data_container_mut(name)
    }

    /// Insert an existing container.
    pub fn add_data_container(&mut self, container: DataContainer) -> Result<(), DataError> {
        validate_name(container.name())?;
        if self.containers.contains_key(container.name()) {
            return Err(DataError::AlreadyExists {
                path: container.name().to_string(),
            });
        }
        self.containers
            .insert(container.name().to_string(), container);
        Ok(())
    }

    /// Create an empty attribute matrix at `path` (container/matrix).
    ///
    /// Fails with [`DataError::ContainerNotFound`],
    /// [`DataError::AlreadyExists`], [`DataError::InvalidName`], or
    /// [`DataError::GeometryMismatch`].
    pub fn create_non_prereq_attribute_matrix(
        &mut self,
        path: &DataArrayPath,
        matrix_type: AttributeMatrixType,
        tuple_dims: &[usize],
    ) -> Result<&mut AttributeMatrix, DataError> {
        path.require_depth(2)?;
        let matrix = path.matrix_name().unwrap_or_default();
        self.data_container_mut(path.container_name())?
            .create_attribute_matrix(matrix, matrix_type, tuple_dims)
    }

    fn new_array_slot(&mut self, path: &DataArrayPath) -> Result<&mut AttributeMatrix, DataError> {
        path.require_depth(3)?;
        let array = path.array_name().unwrap_or_default();
        let matrix = self.attribute_matrix_mut(&path.matrix_path())?;
        if matrix.contains_array(array) {
            return Err(DataError::AlreadyExists {
                path: path.to_string(),
            });
        }
        Ok(matrix)
    }

    /// Allocate a new array at `path` with its matrix's tuple count.
    pub fn create_array<T: ArrayElement>(
        &mut self,
        path: &DataArrayPath,
        component_dims: &[usize],
        init: T,
    ) -> Result<&mut DataArray<T>, DataError> {
        let array = path.array_name().unwrap_or_default().to_string();
        self.new_array_slot(path)?
            .create_array(&array, component_dims, init)
    }

    /// Add a placeholder array at `path`.
    pub fn create_placeholder<T: ArrayElement>(
        &mut self,
        path: &DataArrayPath,
        component_dims: &[usize],
    ) -> Result<&mut DataArray<T>, DataError> {
        let array = path.array_name().unwrap_or_default().to_string();
        self.new_array_slot(path)?
            .create_placeholder(&array, component_dims)
    }

    /// Add an array of a runtime-chosen element type at `path`, either as
    /// a placeholder or allocated and filled with `init`.
    pub fn create_dynamic_array(
        &mut self,
        path: &DataArrayPath,
        numeric_type: NumericType,
        component_dims: &[usize],
        init: f64,
        placeholder: bool,
    ) -> Result<&mut AnyArray, DataError> {
        let array = path.array_name().unwrap_or_default().to_string();
        self.new_array_slot(path)?.create_dynamic_array(
            numeric_type,
            &array,
            component_dims,
            init,
            placeholder,
        )
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Container by name.
    pub fn data_container(&self, name: &str) -> Result<&DataContainer, DataError> {
        self.containers
            .get(name)
            .ok_or_else(|| DataError::ContainerNotFound {
                name: name.to_string(),
            })
    }

    /// Container by name, mutably.
    pub fn data_container_mut(&mut self, name: &str) -> Result<&mut DataContainer, DataError> {
        self.containers
            .get_mut(name)
            .ok_or_else(|| DataError::ContainerNotFound {
                name: name.to_string(),
            })
    }

    /// Container together with its geometry as a concrete type.
    ///
    /// Fails with [`DataError::ContainerNotFound`] or
    /// [`DataError::WrongGeometryType`].
    pub fn data_container_as<G: GeometryType>(
        &self,
        name: &str,
    ) -> Result<(&DataContainer, &G), DataError> {
        let dc = self.data_container(name)?;
        Ok((dc, dc.geometry_as::<G>()?))
    }

    /// Attribute matrix at `path` (at least container/matrix).
    pub fn attribute_matrix(&self, path: &DataArrayPath) -> Result<&AttributeMatrix, DataError> {
        path.require_depth(2)?;
        let matrix = path.matrix_name().unwrap_or_default();
        self.data_container(path.container_name())?
            .matrix(matrix)
            .ok_or_else(|| DataError::MatrixNotFound {
                path: path.matrix_path().to_string(),
            })
    }

    /// Attribute matrix at `path`, mutably.
    pub fn attribute_matrix_mut(
        &mut self,
        path: &DataArrayPath,
    ) -> Result<&mut AttributeMatrix, DataError> {
        path.require_depth(2)?;
        let matrix = path.matrix_name().unwrap_or_default();
        self.data_container_mut(path.container_name())?
            .matrix_mut(matrix)
            .ok_or_else(|| DataError::MatrixNotFound {
                path: path.matrix_path().to_string(),
            })
    }

    /// Array at `path` (container/matrix/array).
    pub fn array(&self, path: &DataArrayPath) -> Result<&AnyArray, DataError> {
        path.require_depth(3)?;
        let array = path.array_name().unwrap_or_default();
        self.attribute_matrix(path)?
            .get_array(array)
            .ok_or_else(|| DataError::ArrayNotFound {
                path: path.to_string(),
            })
    }

    /// Array at `path`, mutably.
    pub fn array_mut(&mut self, path: &DataArrayPath) -> Result<&mut AnyArray, DataError> {
        path.require_depth(3)?;
        let array = path.array_name().unwrap_or_default();
        self.attribute_matrix_mut(path)?
            .get_array_mut(array)
            .ok_or_else(|| DataError::ArrayNotFound {
                path: path.to_string(),
            })
    }

    /// Typed array at `path`.
    ///
    /// Fails with a not-found error for any missing level, or
    /// [`DataError::TypeMismatch`] if the element type differs.
    pub fn typed_array<T: ArrayElement>(
        &self,
        path: &DataArrayPath,
    ) -> Result<&DataArray<T>, DataError> {
        let any = self.array(path)?;
        T::from_any(any).ok_or_else(|| DataError::TypeMismatch {
            path: path.to_string(),
            expected: T::TYPE,
            actual: any.numeric_type(),
        })
    }

    /// Typed array at `path`, mutably.
    pub fn typed_array_mut<T: ArrayElement>(
        &mut self,
        path: &DataArrayPath,
    ) -> Result<&mut DataArray<T>, DataError> {
        let any = self.array_mut(path)?;
        let actual = any.numeric_type();
        T::from_any_mut(any).ok_or_else(|| DataError::TypeMismatch {
            path: path.to_string(),
            expected: T::TYPE,
            actual,
        })
    }

    /// A required input array: typed lookup plus a component shape check.
    pub fn prereq_array<T: ArrayElement>(
        &self,
        path: &DataArrayPath,
        component_dims: &[usize],
    ) -> Result<&DataArray<T>, DataError> {
        let array = self.typed_array::<T>(path)?;
        if array.component_dims() != component_dims {
            return Err(DataError::ComponentMismatch {
                path: path.to_string(),
                expected: component_dims.to_vec(),
                actual: array.component_dims().to_vec(),
            });
        }
        Ok(array)
    }

    // ── Handles ────────────────────────────────────────────────────

    /// A weak reference to the array at `path`, stamped with its matrix's
    /// current generation.
    pub fn array_ref(&self, path: &DataArrayPath) -> Result<ArrayRef, DataError> {
        self.array(path)?;
        let generation = self.attribute_matrix(path)?.generation();
        Ok(ArrayRef::new(path.clone(), generation))
    }

    fn check_generation(&self, handle: &ArrayRef) -> Result<(), DataError> {
        let current = self.attribute_matrix(handle.path())?.generation();
        if current != handle.generation() {
            return Err(DataError::StaleHandle {
                path: handle.path().to_string(),
                handle_generation: handle.generation(),
                current_generation: current,
            });
        }
        Ok(())
    }

    /// Resolve a handle to its array.
    ///
    /// Fails with [`DataError::StaleHandle`] if the matrix changed
    /// structurally since the handle was taken.
    pub fn resolve_any(&self, handle: &ArrayRef) -> Result<&AnyArray, DataError> {
        self.check_generation(handle)?;
        self.array(handle.path())
    }

    /// Resolve a handle to its array, mutably.
    pub fn resolve_any_mut(&mut self, handle: &ArrayRef) -> Result<&mut AnyArray, DataError> {
        self.check_generation(handle)?;
        self.array_mut(handle.path())
    }

    /// Resolve a handle to a typed array.
    pub fn resolve<T: ArrayElement>(&self, handle: &ArrayRef) -> Result<&DataArray<T>, DataError> {
        self.check_generation(handle)?;
        self.typed_array(handle.path())
    }

    /// Resolve a handle to a typed array, mutably.
    pub fn resolve_mut<T: ArrayElement>(
        &mut self,
        handle: &ArrayRef,
    ) -> Result<&mut DataArray<T>, DataError> {
        self.check_generation(handle)?;
        self.typed_array_mut(handle.path())
    }

    // ── Structural changes ─────────────────────────────────────────

    /// Remove a container, keeping the order of the others.
    pub fn remove_data_container(&mut self, name: &str) -> Option<DataContainer> {
        self.containers.shift_remove(name)
    }

    /// Remove whatever `path` names: a container, a matrix, or an array.
    pub fn remove_path(&mut self, path: &DataArrayPath) -> Result<(), DataError> {
        match (path.matrix_name(), path.array_name()) {
            _ if path.is_empty() => Err(DataError::IncompletePath {
                path: path.to_string(),
                required: 1,
            }),
            (None, _) => self
                .remove_data_container(path.container_name())
                .map(drop)
                .ok_or_else(|| DataError::ContainerNotFound {
                    name: path.container_name().to_string(),
                }),
            (Some(matrix), None) => self
                .data_container_mut(path.container_name())?
                .remove_attribute_matrix(matrix)
                .map(drop)
                .ok_or_else(|| DataError::MatrixNotFound {
                    path: path.to_string(),
                }),
            (Some(_), Some(array)) => self
                .attribute_matrix_mut(path)?
                .remove_array(array)
                .map(drop)
                .ok_or_else(|| DataError::ArrayNotFound {
                    path: path.to_string(),
                }),
        }
    }

    /// Rename a container in place (its position is kept).
    pub fn rename_data_container(&mut self, old: &str, new: &str) -> Result<(), DataError> {
        if !self.containers.contains_key(old) {
            return Err(DataError::ContainerNotFound {
                name: old.to_string(),
            });
        }
        validate_name(new)?;
        if self.containers.contains_key(new) {
            return Err(DataError::AlreadyExists {
                path: new.to_string(),
            });
        }
        if let Some((index, _, mut dc)) = self.containers.shift_remove_full(old) {
            dc.set_name(new.to_string());
            let (last, _) = self.containers.insert_full(new.to_string(), dc);
            self.containers.move_index(last, index);
        }
        Ok(())
    }

    /// Resize the matrix at `path` and every array in it. See
    /// [`AttributeMatrix::resize_attribute_arrays`].
    pub fn resize_attribute_matrix(
        &mut self,
        path: &DataArrayPath,
        tuple_dims: &[usize],
    ) -> Result<(), DataError> {
        path.require_depth(2)?;
        let matrix = path.matrix_name().unwrap_or_default();
        self.data_container_mut(path.container_name())?
            .resize_attribute_matrix(matrix, tuple_dims)
    }

    // ── Whole-structure operations ─────────────────────────────────

    /// Data-free description of the whole structure.
    pub fn schema(&self) -> DataStructureSchema {
        DataStructureSchema {
            containers: self.containers.values().map(Into::into).collect(),
        }
    }

    /// A fresh container array with the same structure where every array
    /// is a placeholder.
    pub fn schema_clone(&self) -> Self {
        Self {
            containers: self
                .containers
                .iter()
                .map(|(k, dc)| (k.clone(), dc.schema_clone()))
                .collect(),
        }
    }

    /// Check every container, matrix, and array invariant.
    pub fn validate(&self) -> Result<(), DataError> {
        self.containers.values().try_for_each(DataContainer::validate)
    }

    /// Bytes held by all arrays.
    pub fn memory_bytes(&self) -> usize {
        self.containers.values().map(DataContainer::memory_bytes).sum()
    }
}
