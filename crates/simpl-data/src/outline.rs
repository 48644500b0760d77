//! Structure-only view of the serde form of a [`DataContainerArray`].
//!
//! Mirrors the stored layout but skips every array's `data` field, so a
//! data file's structure can be read without allocating its payload.

use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};
use simpl_core::{AttributeMatrixType, DataError, Dims, NumericType};

use crate::any_array::AnyArray;
use crate::container::DataContainer;
use crate::container_array::DataContainerArray;
use crate::geometry::Geometry;
use crate::matrix::AttributeMatrix;

#[derive(Deserialize)]
struct ContainerArrayOutline {
    containers: Vec<ContainerOutline>,
}

#[derive(Deserialize)]
struct ContainerOutline {
    name: String,
    #[serde(default)]
    geometry: Option<Geometry>,
    matrices: Vec<MatrixOutline>,
}

#[derive(Deserialize)]
struct MatrixOutline {
    name: String,
    matrix_type: AttributeMatrixType,
    tuple_dims: Dims,
    arrays: Vec<ArrayOutline>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ArrayOutline {
    Int8(ArrayShape),
    UInt8(ArrayShape),
    Int16(ArrayShape),
    UInt16(ArrayShape),
    Int32(ArrayShape),
    UInt32(ArrayShape),
    Int64(ArrayShape),
    UInt64(ArrayShape),
    Float32(ArrayShape),
    Float64(ArrayShape),
    Bool(ArrayShape),
}

#[derive(Deserialize)]
struct ArrayShape {
    name: String,
    component_dims: Dims,
    #[allow(dead_code)]
    data: IgnoredAny,
}

impl ArrayOutline {
    fn into_placeholder(self) -> Result<AnyArray, DataError> {
        let (ty, shape) = match self {
            Self::Int8(s) => (NumericType::Int8, s),
            Self::UInt8(s) => (NumericType::UInt8, s),
            Self::Int16(s) => (NumericType::Int16, s),
            Self::UInt16(s) => (NumericType::UInt16, s),
            Self::Int32(s) => (NumericType::Int32, s),
            Self::UInt32(s) => (NumericType::UInt32, s),
            Self::Int64(s) => (NumericType::Int64, s),
            Self::UInt64(s) => (NumericType::UInt64, s),
            Self::Float32(s) => (NumericType::Float32, s),
            Self::Float64(s) => (NumericType::Float64, s),
            Self::Bool(s) => (NumericType::Bool, s),
        };
        AnyArray::placeholder(ty, shape.name, &shape.component_dims)
    }
}

impl MatrixOutline {
    fn build(self) -> Result<AttributeMatrix, DataError> {
        let mut matrix = AttributeMatrix::new(self.name, self.matrix_type, &self.tuple_dims)?;
        for array in self.arrays {
            matrix.add_array(array.into_placeholder()?)?;
        }
        Ok(matrix)
    }
}

impl ContainerOutline {
    fn build(self) -> Result<DataContainer, DataError> {
        let mut container = DataContainer::new(self.name)?;
        if let Some(geometry) = self.geometry {
            container.set_geometry(geometry)?;
        }
        for matrix in self.matrices {
            container.add_attribute_matrix(matrix.build()?)?;
        }
        Ok(container)
    }
}

impl DataContainerArray {
    /// Deserialize only the structure of a stored container array.
    ///
    /// Every array comes back as a placeholder; stored values are skipped
    /// without being collected. For a well-formed input the result has the
    /// same schema as the full read's `schema_clone()`.
    pub fn deserialize_structure<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let outline = ContainerArrayOutline::deserialize(deserializer)?;
        let mut dca = Self::new();
        for container in outline.containers {
            let container = container.build().map_err(D::Error::custom)?;
            dca.add_data_container(container).map_err(D::Error::custom)?;
        }
        Ok(dca)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageGeom;
    use simpl_core::DataArrayPath;

    fn sample() -> DataContainerArray {
        let mut dca = DataContainerArray::new();
        let dc = dca.create_non_prereq_data_container("Image").unwrap();
        dc.set_geometry(ImageGeom::new([2, 2, 1])).unwrap();
        dca.create_non_prereq_attribute_matrix(
            &DataArrayPath::for_matrix("Image", "Cell"),
            AttributeMatrixType::Cell,
            &[4],
        )
        .unwrap();
        dca.create_array::<f32>(&DataArrayPath::new("Image", "Cell", "Phi"), &[3], 0.5)
            .unwrap();
        dca.create_array::<i64>(&DataArrayPath::new("Image", "Cell", "Ids"), &[1], 7)
            .unwrap();
        dca.create_array::<bool>(&DataArrayPath::new("Image", "Cell", "Mask"), &[1], true)
            .unwrap();
        dca
    }

    #[test]
    fn structure_matches_schema_clone() {
        let dca = sample();
        let json = serde_json::to_string(&dca).unwrap();
        let mut de = serde_json::Deserializer::from_str(&json);
        let outline = DataContainerArray::deserialize_structure(&mut de).unwrap();
        de.end().unwrap();
        assert_eq!(outline.schema(), dca.schema_clone().schema());
        let ids = outline
            .array(&DataArrayPath::new("Image", "Cell", "Ids"))
            .unwrap();
        assert!(ids.is_placeholder());
        assert_eq!(ids.numeric_type(), NumericType::Int64);
        assert_eq!(outline.memory_bytes(), 0);
        outline.validate().unwrap();
    }

    #[test]
    fn structure_skips_malformed_payload_length() {
        // A wrong-length payload is only caught by the full read.
        let json = r#"{"containers":[{"name":"C","matrices":[{"name":"M",
            "matrix_type":"Cell","tuple_dims":[2],"arrays":[{"int32":{"name":"X",
            "component_dims":[1],"tuples":2,"init_value":0,"data":[1,2,3]}}]}]}]}"#;
        assert!(serde_json::from_str::<DataContainerArray>(json).is_err());
        let mut de = serde_json::Deserializer::from_str(json);
        let outline = DataContainerArray::deserialize_structure(&mut de).unwrap();
        assert!(outline
            .array(&DataArrayPath::new("C", "M", "X"))
            .unwrap()
            .is_placeholder());
    }

    #[test]
    fn structure_rejects_duplicate_names() {
        let json = r#"{"containers":[{"name":"C","matrices":[]},{"name":"C","matrices":[]}]}"#;
        let mut de = serde_json::Deserializer::from_str(json);
        assert!(DataContainerArray::deserialize_structure(&mut de).is_err());
    }
}
