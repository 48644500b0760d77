//! The [`Filter`] trait.

use indexmap::IndexMap;
use simpl_core::{FilterError, ParameterError};

use crate::context::FilterContext;
use crate::parameter::{ParameterSpec, ParameterValue};

/// How `execute` ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The filter did all its work.
    Completed,
    /// The filter saw the cancel flag and stopped early. Not a failure.
    Cancelled,
}

/// One step of a pipeline.
///
/// # Contract
///
/// - Parameters are set before the pipeline runs and are only read by
///   `data_check`/`execute`.
/// - Filters refer to data only by [`DataArrayPath`], resolved against the
///   context each time. Handles ([`ArrayRef`]) taken in `data_check` may be
///   stored on the filter and used in the `execute` call that follows.
/// - `data_check` runs in both phases and must create every output through
///   the context helpers, so that preflight creates placeholders and
///   execute allocates.
/// - `data_check` in preflight mode must not read array values: the
///   arrays it sees are placeholders.
///
/// # Object safety
///
/// This trait is object-safe; pipelines store filters as
/// `Box<dyn Filter>`.
///
/// [`DataArrayPath`]: simpl_core::DataArrayPath
/// [`ArrayRef`]: simpl_data::ArrayRef
pub trait Filter: Send + 'static {
    /// Stable registry key, e.g. `"CreateDataArray"`.
    fn name(&self) -> &str;

    /// Label for display.
    fn human_label(&self) -> &str;

    /// Group for display.
    fn group(&self) -> &str {
        "Core"
    }

    /// Every parameter this filter accepts, in display order.
    fn parameter_specs(&self) -> Vec<ParameterSpec>;

    /// Current value of a parameter.
    fn parameter(&self, key: &str) -> Option<ParameterValue>;

    /// Set a parameter.
    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError>;

    /// All current parameter values, in spec order.
    fn parameters(&self) -> IndexMap<String, ParameterValue> {
        self.parameter_specs()
            .iter()
            .filter_map(|spec| {
                self.parameter(spec.key)
                    .map(|value| (spec.key.to_string(), value))
            })
            .collect()
    }

    /// Validate inputs and create outputs.
    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError>;

    /// Do the work. Called only after a successful execute-mode
    /// `data_check`.
    fn execute(&mut self, ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError>;
}
