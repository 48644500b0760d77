//! Change the tuple shape of an attribute matrix.

use simpl_core::{DataArrayPath, FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// Resizes the matrix at `AttributeMatrixPath` and every array in it to
/// `NewTupleDimensions`.
///
/// In preflight only the matrix shape changes; placeholders stay empty.
/// Existing values are kept up to the smaller tuple count and new tuples
/// take each array's initial value.
#[derive(Clone, Debug)]
pub struct ResizeAttributeMatrix {
    path: DataArrayPath,
    tuple_dims: Vec<usize>,
}

impl ResizeAttributeMatrix {
    /// Registry name.
    pub const NAME: &'static str = "ResizeAttributeMatrix";

    /// Resize `path` to `tuple_dims`.
    pub fn new(path: DataArrayPath, tuple_dims: &[usize]) -> Self {
        Self {
            path,
            tuple_dims: tuple_dims.to_vec(),
        }
    }
}

impl Default for ResizeAttributeMatrix {
    fn default() -> Self {
        Self::new(DataArrayPath::default(), &[1])
    }
}

impl Filter for ResizeAttributeMatrix {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Resize Attribute Matrix"
    }

    fn group(&self) -> &str {
        "Memory/Management"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("AttributeMatrixPath", "Attribute Matrix"),
            ParameterSpec::new("NewTupleDimensions", "New Tuple Dimensions", ParameterKind::Dims),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "AttributeMatrixPath" => Some(self.path.clone().into()),
            "NewTupleDimensions" => Some(self.tuple_dims.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "AttributeMatrixPath" => self.path = value.extract(key)?,
            "NewTupleDimensions" => self.tuple_dims = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        ctx.dca_mut()
            .resize_attribute_matrix(&self.path, &self.tuple_dims)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
