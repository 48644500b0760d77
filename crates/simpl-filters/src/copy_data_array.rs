//! Copy an array into a sibling array.

use simpl_core::{DataArrayPath, DataError, FilterError, ParameterError};
use simpl_data::ArrayRef;
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

use crate::stored_handle;

/// Copies `SelectedArrayPath` into a new array called `NewArrayName` in
/// the same matrix, with the same element type and component shape.
#[derive(Clone, Debug)]
pub struct CopyDataArray {
    source: DataArrayPath,
    new_name: String,
    source_ref: Option<ArrayRef>,
    dest_ref: Option<ArrayRef>,
}

impl CopyDataArray {
    /// Registry name.
    pub const NAME: &'static str = "CopyDataArray";

    /// Copy `source` to `new_name`.
    pub fn new(source: DataArrayPath, new_name: impl Into<String>) -> Self {
        Self {
            source,
            new_name: new_name.into(),
            source_ref: None,
            dest_ref: None,
        }
    }

    /// Path of the array this filter creates.
    pub fn destination(&self) -> DataArrayPath {
        self.source.with_array(self.new_name.clone())
    }
}

impl Default for CopyDataArray {
    fn default() -> Self {
        Self::new(DataArrayPath::default(), "")
    }
}

impl Filter for CopyDataArray {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Copy Data Array"
    }

    fn group(&self) -> &str {
        "Memory/Management"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("SelectedArrayPath", "Array to Copy"),
            ParameterSpec::new("NewArrayName", "Copied Array", ParameterKind::String),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "SelectedArrayPath" => Some(self.source.clone().into()),
            "NewArrayName" => Some(self.new_name.as_str().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "SelectedArrayPath" => self.source = value.extract(key)?,
            "NewArrayName" => self.new_name = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.source.require_depth(3)?;
        let source = ctx.dca().array(&self.source)?;
        let numeric_type = source.numeric_type();
        let component_dims = source.component_dims().to_vec();
        let dest = self.destination();
        self.dest_ref = Some(ctx.create_dynamic_array(&dest, numeric_type, &component_dims, 0.0)?);
        self.source_ref = Some(ctx.prereq_any_array(&self.source)?);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        let source = stored_handle(&self.source_ref, Self::NAME)?;
        let dest = stored_handle(&self.dest_ref, Self::NAME)?;
        let values = ctx.dca().resolve_any(source)?.clone();
        let out = ctx.dca_mut().resolve_any_mut(dest)?;
        if !out.copy_values_from(&values) {
            return Err(DataError::ComponentMismatch {
                path: dest.path().to_string(),
                expected: values.component_dims().to_vec(),
                actual: out.component_dims().to_vec(),
            }
            .into());
        }
        Ok(ExecuteOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_core::{AttributeMatrixType, ErrorKind, NumericType};
    use simpl_data::{AnyArray, DataContainerArray};
    use simpl_filter::{CancelToken, FilterInstance, FilterState, NullObserver, RunMode};

    fn dca() -> DataContainerArray {
        let mut dca = DataContainerArray::new();
        dca.create_non_prereq_data_container("C").unwrap();
        dca.create_non_prereq_attribute_matrix(
            &DataArrayPath::for_matrix("C", "M"),
            AttributeMatrixType::Generic,
            &[3],
        )
        .unwrap();
        let x = dca
            .create_array::<u16>(&DataArrayPath::new("C", "M", "X"), &[2], 0)
            .unwrap();
        x.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        dca
    }

    #[test]
    fn copies_values_type_and_shape() {
        let mut data = dca();
        let mut inst = FilterInstance::from(CopyDataArray::new(DataArrayPath::new("C", "M", "X"), "Y"));
        inst.execute(&mut data, &CancelToken::new(), &NullObserver, 0).unwrap();
        assert_eq!(inst.state(), FilterState::ExecuteOk);
        let y = data.typed_array::<u16>(&DataArrayPath::new("C", "M", "Y")).unwrap();
        assert_eq!(y.component_dims(), &[2]);
        assert_eq!(y.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn preflight_leaves_a_placeholder() {
        let mut schema = dca().schema_clone();
        let mut inst = FilterInstance::from(CopyDataArray::new(DataArrayPath::new("C", "M", "X"), "Y"));
        inst.preflight(&mut schema, &NullObserver, 0).unwrap();
        assert!(schema
            .array(&DataArrayPath::new("C", "M", "Y"))
            .unwrap()
            .is_placeholder());
    }

    #[test]
    fn reshaped_destination_reports_component_mismatch() {
        let mut data = dca();
        let cancel = CancelToken::new();
        let y = DataArrayPath::new("C", "M", "Y");
        let mut f = CopyDataArray::new(DataArrayPath::new("C", "M", "X"), "Y");
        let mut ctx = FilterContext::new(&mut data, RunMode::Execute, &cancel, &NullObserver, 0, "f");
        f.data_check(&mut ctx).unwrap();
        *ctx.dca_mut().array_mut(&y).unwrap() =
            AnyArray::new_filled(NumericType::UInt16, "Y", 3, &[3], 0.0).unwrap();

        let err = f.execute(&mut ctx).unwrap_err();
        let expected = DataError::ComponentMismatch {
            path: y.to_string(),
            expected: vec![2],
            actual: vec![3],
        };
        assert_eq!(err.code, expected.code());
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, expected.to_string());
    }

    #[test]
    fn missing_source_fails() {
        let mut data = dca();
        let mut inst = FilterInstance::from(CopyDataArray::new(DataArrayPath::new("C", "M", "Q"), "Y"));
        let err = inst.preflight(&mut data, &NullObserver, 0).unwrap_err();
        assert_eq!(err.code, -10012);
        assert_eq!(inst.state(), FilterState::PreflightFailed);
    }
}
