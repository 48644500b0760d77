//! Rename an array within its matrix.

use simpl_core::{DataArrayPath, FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// Renames `SelectedArrayPath` to `NewArrayName`, keeping its position in
/// the matrix. Handles to arrays in that matrix go stale.
#[derive(Clone, Debug, Default)]
pub struct RenameAttributeArray {
    path: DataArrayPath,
    new_name: String,
}

impl RenameAttributeArray {
    /// Registry name.
    pub const NAME: &'static str = "RenameAttributeArray";

    /// Rename the array at `path` to `new_name`.
    pub fn new(path: DataArrayPath, new_name: impl Into<String>) -> Self {
        Self {
            path,
            new_name: new_name.into(),
        }
    }
}

impl Filter for RenameAttributeArray {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Rename Attribute Array"
    }

    fn group(&self) -> &str {
        "Memory/Management"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("SelectedArrayPath", "Attribute Array to Rename"),
            ParameterSpec::new("NewArrayName", "New Attribute Array Name", ParameterKind::String),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "SelectedArrayPath" => Some(self.path.clone().into()),
            "NewArrayName" => Some(self.new_name.as_str().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "SelectedArrayPath" => self.path = value.extract(key)?,
            "NewArrayName" => self.new_name = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.path.require_depth(3)?;
        let old = self.path.array_name().unwrap_or_default();
        ctx.dca_mut()
            .attribute_matrix_mut(&self.path.matrix_path())?
            .rename_array(old, &self.new_name)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_core::AttributeMatrixType;
    use simpl_data::DataContainerArray;
    use simpl_filter::{CancelToken, NullObserver, RunMode};

    #[test]
    fn renames_in_place_and_stales_handles() {
        let mut dca = DataContainerArray::new();
        dca.create_non_prereq_data_container("C").unwrap();
        let m = DataArrayPath::for_matrix("C", "M");
        dca.create_non_prereq_attribute_matrix(&m, AttributeMatrixType::Generic, &[2])
            .unwrap();
        for name in ["A", "B", "Z"] {
            dca.create_array::<i8>(&m.with_array(name), &[1], 0).unwrap();
        }
        let handle = dca.array_ref(&m.with_array("Z")).unwrap();

        let cancel = CancelToken::new();
        let mut f = RenameAttributeArray::new(m.with_array("B"), "Q");
        let mut ctx = FilterContext::new(&mut dca, RunMode::Execute, &cancel, &NullObserver, 0, "f");
        f.data_check(&mut ctx).unwrap();

        let names: Vec<_> = dca.attribute_matrix(&m).unwrap().array_names().collect();
        assert_eq!(names, vec!["A", "Q", "Z"]);
        assert_eq!(dca.resolve_any(&handle).unwrap_err().code(), -10013);
    }

    #[test]
    fn collision_is_reported() {
        let mut dca = DataContainerArray::new();
        dca.create_non_prereq_data_container("C").unwrap();
        let m = DataArrayPath::for_matrix("C", "M");
        dca.create_non_prereq_attribute_matrix(&m, AttributeMatrixType::Generic, &[2])
            .unwrap();
        dca.create_array::<i8>(&m.with_array("A"), &[1], 0).unwrap();
        dca.create_array::<i8>(&m.with_array("B"), &[1], 0).unwrap();

        let cancel = CancelToken::new();
        let mut f = RenameAttributeArray::new(m.with_array("A"), "B");
        let mut ctx = FilterContext::new(&mut dca, RunMode::Preflight, &cancel, &NullObserver, 0, "f");
        assert_eq!(f.data_check(&mut ctx).unwrap_err().code, -10003);
    }
}
