//! [`DataContainer`]: attribute matrices plus an optional geometry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use simpl_core::path::validate_name;
use simpl_core::{AttributeMatrixType, DataError};

use crate::geometry::{Geometry, GeometryType};
use crate::matrix::AttributeMatrix;
use crate::named_seq;

/// A named group of attribute matrices describing one object, optionally
/// with a geometry.
///
/// When a geometry is present, every geometry-bound matrix whose type the
/// geometry constrains has exactly as many tuples as the geometry has
/// elements of that kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataContainer {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<Geometry>,
    #[serde(with = "named_seq")]
    matrices: IndexMap<String, AttributeMatrix>,
}

impl DataContainer {
    /// An empty container without geometry.
    pub fn new(name: impl Into<String>) -> Result<Self, DataError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            geometry: None,
            matrices: IndexMap::new(),
        })
    }

    /// Container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn matrix_path(&self, matrix: &str) -> String {
        format!("{}/{}", self.name, matrix)
    }

    fn check_geometry(
        &self,
        geometry: Option<&Geometry>,
        matrix: &str,
        matrix_type: AttributeMatrixType,
        tuples: usize,
    ) -> Result<(), DataError> {
        if !matrix_type.is_geometry_bound() {
            return Ok(());
        }
        match geometry.and_then(|g| g.element_count(matrix_type)) {
            Some(expected) if expected != tuples => Err(DataError::GeometryMismatch {
                path: self.matrix_path(matrix),
                expected,
                actual: tuples,
            }),
            _ => Ok(()),
        }
    }

    /// The geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// The geometry as a concrete type.
    ///
    /// Fails with [`DataError::WrongGeometryType`] if the container has no
    /// geometry or a different kind.
    pub fn geometry_as<G: GeometryType>(&self) -> Result<&G, DataError> {
        self.geometry
            .as_ref()
            .and_then(G::from_geometry)
            .ok_or_else(|| DataError::WrongGeometryType {
                container: self.name.clone(),
                expected: G::KIND.name().to_string(),
                actual: self.geometry.as_ref().map(|g| g.kind().name().to_string()),
            })
    }

    /// Set (or replace) the geometry. Existing geometry-bound matrices must
    /// agree with it.
    pub fn set_geometry(&mut self, geometry: impl Into<Geometry>) -> Result<(), DataError> {
        let geometry = geometry.into();
        for m in self.matrices.values() {
            self.check_geometry(Some(&geometry), m.name(), m.matrix_type(), m.tuples())?;
        }
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Remove the geometry.
    pub fn clear_geometry(&mut self) -> Option<Geometry> {
        self.geometry.take()
    }

    /// Create an empty matrix.
    ///
    /// Fails with [`DataError::AlreadyExists`], [`DataError::InvalidName`],
    /// or [`DataError::GeometryMismatch`].
    pub fn create_attribute_matrix(
        &mut self,
        name: &str,
        matrix_type: AttributeMatrixType,
        tuple_dims: &[usize],
    ) -> Result<&mut AttributeMatrix, DataError> {
        let matrix = AttributeMatrix::new(name, matrix_type, tuple_dims)?;
        self.add_attribute_matrix(matrix)?;
        let path = self.matrix_path(name);
        self.matrices
            .get_mut(name)
            .ok_or(DataError::MatrixNotFound { path })
    }

    /// Insert an existing matrix.
    pub fn add_attribute_matrix(&mut self, matrix: AttributeMatrix) -> Result<(), DataError> {
        validate_name(matrix.name())?;
        if self.matrices.contains_key(matrix.name()) {
            return Err(DataError::AlreadyExists {
                path: self.matrix_path(matrix.name()),
            });
        }
        self.check_geometry(
            self.geometry.as_ref(),
            matrix.name(),
            matrix.matrix_type(),
            matrix.tuples(),
        )?;
        self.matrices.insert(matrix.name().to_string(), matrix);
        Ok(())
    }

    /// Resize a matrix and all its arrays. Geometry-bound matrices must
    /// keep matching the geometry.
    pub fn resize_attribute_matrix(
        &mut self,
        name: &str,
        tuple_dims: &[usize],
    ) -> Result<(), DataError> {
        let matrix_type = self
            .matrix(name)
            .ok_or_else(|| DataError::MatrixNotFound {
                path: self.matrix_path(name),
            })?
            .matrix_type();
        if let Some(tuples) = simpl_core::shape_product(tuple_dims) {
            self.check_geometry(self.geometry.as_ref(), name, matrix_type, tuples)?;
        }
        let path = self.matrix_path(name);
        match self.matrices.get_mut(name) {
            Some(m) => m.resize_attribute_arrays(tuple_dims),
            None => Err(DataError::MatrixNotFound { path }),
        }
    }

    /// Matrix by name.
    pub fn matrix(&self, name: &str) -> Option<&AttributeMatrix> {
        self.matrices.get(name)
    }

    /// Matrix by name, mutably.
    pub fn matrix_mut(&mut self, name: &str) -> Option<&mut AttributeMatrix> {
        self.matrices.get_mut(name)
    }

    /// Remove a matrix, keeping the order of the others.
    pub fn remove_attribute_matrix(&mut self, name: &str) -> Option<AttributeMatrix> {
        self.matrices.shift_remove(name)
    }

    /// Rename a matrix in place (its position is kept).
    pub fn rename_attribute_matrix(&mut self, old: &str, new: &str) -> Result<(), DataError> {
        if !self.matrices.contains_key(old) {
            return Err(DataError::MatrixNotFound {
                path: self.matrix_path(old),
            });
        }
        validate_name(new)?;
        if self.matrices.contains_key(new) {
            return Err(DataError::AlreadyExists {
                path: self.matrix_path(new),
            });
        }
        if let Some((index, _, mut matrix)) = self.matrices.shift_remove_full(old) {
            matrix.set_name(new.to_string());
            let (last, _) = self.matrices.insert_full(new.to_string(), matrix);
            self.matrices.move_index(last, index);
        }
        Ok(())
    }

    /// Whether a matrix with this name exists.
    pub fn contains_matrix(&self, name: &str) -> bool {
        self.matrices.contains_key(name)
    }

    /// Matrix names in insertion order.
    pub fn matrix_names(&self) -> impl Iterator<Item = &str> {
        self.matrices.keys().map(String::as_str)
    }

    /// Matrices in insertion order.
    pub fn matrices(&self) -> impl Iterator<Item = &AttributeMatrix> {
        self.matrices.values()
    }

    /// Check the name, every matrix, and the geometry constraint.
    pub fn validate(&self) -> Result<(), DataError> {
        validate_name(&self.name)?;
        for m in self.matrices.values() {
            m.validate()?;
            self.check_geometry(
                self.geometry.as_ref(),
                m.name(),
                m.matrix_type(),
                m.tuples(),
            )?;
        }
        Ok(())
    }

    /// The same structure with every array replaced by a placeholder.
    pub fn schema_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            geometry: self.geometry.clone(),
            matrices: self
                .matrices
                .iter()
                .map(|(k, m)| (k.clone(), m.schema_clone()))
                .collect(),
        }
    }

    /// Bytes held by all arrays.
    pub fn memory_bytes(&self) -> usize {
        self.matrices.values().map(AttributeMatrix::memory_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ImageGeom, VertexGeom};

    fn image_container() -> DataContainer {
        let mut dc = DataContainer::new("Image").unwrap();
        dc.set_geometry(ImageGeom::new([2, 3, 4])).unwrap();
        dc
    }

    #[test]
    fn cell_matrix_must_match_image_geometry() {
        let mut dc = image_container();
        assert!(dc
            .create_attribute_matrix("CellData", AttributeMatrixType::Cell, &[2, 3, 4])
            .is_ok());
        assert!(matches!(
            dc.create_attribute_matrix("Bad", AttributeMatrixType::Cell, &[5]),
            Err(DataError::GeometryMismatch {
                expected: 24,
                actual: 5,
                ..
            })
        ));
        assert!(dc
            .create_attribute_matrix("Grains", AttributeMatrixType::CellFeature, &[7])
            .is_ok());
    }

    #[test]
    fn set_geometry_checks_existing_matrices() {
        let mut dc = DataContainer::new("C").unwrap();
        dc.create_attribute_matrix("CellData", AttributeMatrixType::Cell, &[10])
            .unwrap();
        assert!(dc.set_geometry(ImageGeom::new([2, 2, 2])).is_err());
        assert!(dc.geometry().is_none());
        dc.set_geometry(ImageGeom::new([10, 1, 1])).unwrap();
        assert!(dc.validate().is_ok());
    }

    #[test]
    fn geometry_as_reports_wrong_kind() {
        let dc = image_container();
        assert_eq!(dc.geometry_as::<ImageGeom>().unwrap().dims, [2, 3, 4]);
        let err = dc.geometry_as::<VertexGeom>().unwrap_err();
        assert_eq!(
            err,
            DataError::WrongGeometryType {
                container: "Image".into(),
                expected: "Vertex".into(),
                actual: Some("Image".into()),
            }
        );
        let bare = DataContainer::new("Bare").unwrap();
        assert!(matches!(
            bare.geometry_as::<ImageGeom>(),
            Err(DataError::WrongGeometryType { actual: None, .. })
        ));
    }

    #[test]
    fn resize_of_bound_matrix_is_checked_against_geometry() {
        let mut dc = image_container();
        dc.create_attribute_matrix("CellData", AttributeMatrixType::Cell, &[24])
            .unwrap();
        assert!(matches!(
            dc.resize_attribute_matrix("CellData", &[12]),
            Err(DataError::GeometryMismatch { .. })
        ));
        assert_eq!(dc.matrix("CellData").unwrap().tuples(), 24);
    }

    #[test]
    fn rename_and_remove_matrices() {
        let mut dc = DataContainer::new("C").unwrap();
        for n in ["A", "B", "C"] {
            dc.create_attribute_matrix(n, AttributeMatrixType::Generic, &[1])
                .unwrap();
        }
        dc.rename_attribute_matrix("A", "Alpha").unwrap();
        assert_eq!(
            dc.matrix_names().collect::<Vec<_>>(),
            vec!["Alpha", "B", "C"]
        );
        assert_eq!(dc.matrix("Alpha").unwrap().name(), "Alpha");
        assert!(dc.remove_attribute_matrix("B").is_some());
        assert!(!dc.contains_matrix("B"));
        assert!(matches!(
            dc.rename_attribute_matrix("Alpha", "C"),
            Err(DataError::AlreadyExists { .. })
        ));
    }
}
