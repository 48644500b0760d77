//! Remove containers, matrices, and arrays.

use simpl_core::{DataArrayPath, FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterCategory,
    ParameterKind, ParameterSpec, ParameterValue,
};

/// Removes every path in `DataArraysToRemove`.
///
/// Deeper paths go first, so a list naming both a matrix and one of its
/// arrays is valid. Every path must exist.
#[derive(Clone, Debug, Default)]
pub struct RemoveArrays {
    paths: Vec<DataArrayPath>,
}

impl RemoveArrays {
    /// Registry name.
    pub const NAME: &'static str = "RemoveArrays";

    /// Remove `paths`.
    pub fn new(paths: Vec<DataArrayPath>) -> Self {
        Self { paths }
    }
}

impl Filter for RemoveArrays {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Delete Data"
    }

    fn group(&self) -> &str {
        "Memory/Management"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("DataArraysToRemove", "Data to Delete", ParameterKind::PathList)
                .with_category(ParameterCategory::RequiredArray),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "DataArraysToRemove" => Some(self.paths.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "DataArraysToRemove" => self.paths = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        let mut ordered: Vec<&DataArrayPath> = self.paths.iter().collect();
        ordered.sort_by_key(|p| std::cmp::Reverse(p.depth()));
        for path in ordered {
            ctx.dca_mut().remove_path(path)?;
        }
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
