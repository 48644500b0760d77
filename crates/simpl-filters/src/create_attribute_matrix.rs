//! Create an empty attribute matrix.

use simpl_core::{AttributeMatrixType, DataArrayPath, FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterCategory,
    ParameterKind, ParameterSpec, ParameterValue,
};

/// Creates an attribute matrix at a `container/matrix` path.
#[derive(Clone, Debug)]
pub struct CreateAttributeMatrix {
    path: DataArrayPath,
    matrix_type: AttributeMatrixType,
    tuple_dims: Vec<usize>,
}

impl CreateAttributeMatrix {
    /// Registry name.
    pub const NAME: &'static str = "CreateAttributeMatrix";

    /// Create a matrix at `path` with the given tuple shape.
    pub fn new(path: DataArrayPath, matrix_type: AttributeMatrixType, tuple_dims: &[usize]) -> Self {
        Self {
            path,
            matrix_type,
            tuple_dims: tuple_dims.to_vec(),
        }
    }
}

impl Default for CreateAttributeMatrix {
    fn default() -> Self {
        Self::new(
            DataArrayPath::for_matrix("DataContainer", "AttributeMatrix"),
            AttributeMatrixType::Generic,
            &[1],
        )
    }
}

impl Filter for CreateAttributeMatrix {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Create Attribute Matrix"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new(
                "CreatedAttributeMatrix",
                "Created Attribute Matrix",
                ParameterKind::Path,
            )
            .with_category(ParameterCategory::CreatedArray),
            ParameterSpec::new(
                "AttributeMatrixType",
                "Attribute Matrix Type",
                ParameterKind::MatrixType,
            ),
            ParameterSpec::new("TupleDimensions", "Tuple Dimensions", ParameterKind::Dims),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "CreatedAttributeMatrix" => Some(self.path.clone().into()),
            "AttributeMatrixType" => Some(self.matrix_type.into()),
            "TupleDimensions" => Some(self.tuple_dims.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "CreatedAttributeMatrix" => self.path = value.extract(key)?,
            "AttributeMatrixType" => self.matrix_type = value.extract(key)?,
            "TupleDimensions" => self.tuple_dims = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        ctx.create_attribute_matrix(&self.path, self.matrix_type, &self.tuple_dims)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
