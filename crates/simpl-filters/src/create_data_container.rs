//! Create an empty data container.

use simpl_core::{FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// Creates an empty data container named `DataContainerName`.
#[derive(Clone, Debug)]
pub struct CreateDataContainer {
    name: String,
}

impl CreateDataContainer {
    /// Registry name.
    pub const NAME: &'static str = "CreateDataContainer";

    /// Create a container called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for CreateDataContainer {
    fn default() -> Self {
        Self::new("DataContainer")
    }
}

impl Filter for CreateDataContainer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Create Data Container"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::new(
            "DataContainerName",
            "Data Container Name",
            ParameterKind::String,
        )]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "DataContainerName" => Some(self.name.as_str().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "DataContainerName" => self.name = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        ctx.create_data_container(&self.name)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_core::ErrorKind;
    use simpl_data::DataContainerArray;
    use simpl_filter::{CancelToken, NullObserver, RunMode};

    #[test]
    fn creates_container_and_rejects_duplicates() {
        let mut dca = DataContainerArray::new();
        let cancel = CancelToken::new();
        let mut f = CreateDataContainer::new("Image");
        let mut ctx = FilterContext::new(&mut dca, RunMode::Execute, &cancel, &NullObserver, 0, "f");
        f.data_check(&mut ctx).unwrap();
        let err = f.data_check(&mut ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(err.code, -10003);
        assert!(dca.contains_data_container("Image"));
    }

    #[test]
    fn invalid_name_is_a_configuration_error() {
        let mut dca = DataContainerArray::new();
        let cancel = CancelToken::new();
        let mut f = CreateDataContainer::new("a/b");
        let mut ctx = FilterContext::new(&mut dca, RunMode::Preflight, &cancel, &NullObserver, 0, "f");
        assert_eq!(f.data_check(&mut ctx).unwrap_err().code, -10001);
    }

    #[test]
    fn parameters_round_trip_by_key() {
        let mut f = CreateDataContainer::default();
        f.set_parameter("DataContainerName", "Mesh".into()).unwrap();
        assert_eq!(f.parameter("DataContainerName"), Some("Mesh".into()));
        assert!(f.set_parameter("Bogus", "x".into()).is_err());
        assert!(f.set_parameter("DataContainerName", ParameterValue::Int(1)).is_err());
    }
}
