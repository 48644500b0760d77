//! Create an array of a runtime-chosen element type.

use simpl_core::{DataArrayPath, FilterError, NumericType, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// `InitializationValue` is outside the range of `ScalarType`.
pub const INIT_OUT_OF_RANGE: i32 = -11010;

/// Creates an array at `NewArray` sized to its matrix and filled with
/// `InitializationValue`.
///
/// All the work happens in `data_check`: preflight adds a placeholder,
/// execute allocates and fills.
#[derive(Clone, Debug)]
pub struct CreateDataArray {
    path: DataArrayPath,
    numeric_type: NumericType,
    component_dims: Vec<usize>,
    init: f64,
}

impl CreateDataArray {
    /// Registry name.
    pub const NAME: &'static str = "CreateDataArray";

    /// Create a single-component array of `numeric_type` at `path`.
    pub fn new(path: DataArrayPath, numeric_type: NumericType) -> Self {
        Self {
            path,
            numeric_type,
            component_dims: vec![1],
            init: 0.0,
        }
    }

    /// Builder-style component shape.
    pub fn with_components(mut self, component_dims: &[usize]) -> Self {
        self.component_dims = component_dims.to_vec();
        self
    }

    /// Builder-style initial value.
    pub fn with_init(mut self, init: f64) -> Self {
        self.init = init;
        self
    }

    fn check_init(&self) -> Result<(), FilterError> {
        let (lo, hi) = match self.numeric_type {
            NumericType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            NumericType::UInt8 => (0.0, u8::MAX as f64),
            NumericType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            NumericType::UInt16 => (0.0, u16::MAX as f64),
            NumericType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            NumericType::UInt32 => (0.0, u32::MAX as f64),
            NumericType::Int64 => (i64::MIN as f64, i64::MAX as f64),
            NumericType::UInt64 => (0.0, u64::MAX as f64),
            NumericType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            NumericType::Float64 | NumericType::Bool => return Ok(()),
        };
        if self.init.is_nan() || self.init < lo || self.init > hi {
            return Err(FilterError::configuration(
                INIT_OUT_OF_RANGE,
                format!(
                    "initialization value {} is out of range for {}",
                    self.init, self.numeric_type
                ),
            ));
        }
        Ok(())
    }
}

impl Default for CreateDataArray {
    fn default() -> Self {
        Self::new(
            DataArrayPath::new("DataContainer", "AttributeMatrix", "NewArray"),
            NumericType::Float32,
        )
    }
}

impl Filter for CreateDataArray {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Create Data Array"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("ScalarType", "Scalar Type", ParameterKind::NumericType),
            ParameterSpec::new(
                "ComponentDimensions",
                "Component Dimensions",
                ParameterKind::Dims,
            ),
            ParameterSpec::new(
                "InitializationValue",
                "Initialization Value",
                ParameterKind::Float,
            ),
            ParameterSpec::created("NewArray", "Created Array"),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "ScalarType" => Some(self.numeric_type.into()),
            "ComponentDimensions" => Some(self.component_dims.clone().into()),
            "InitializationValue" => Some(self.init.into()),
            "NewArray" => Some(self.path.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "ScalarType" => self.numeric_type = value.extract(key)?,
            "ComponentDimensions" => self.component_dims = value.extract(key)?,
            "InitializationValue" => self.init = value.extract(key)?,
            "NewArray" => self.path = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.check_init()?;
        ctx.create_dynamic_array(&self.path, self.numeric_type, &self.component_dims, self.init)
            .map(drop)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
