//! [`FilterContext`]: what a filter sees while it runs.

use simpl_core::{AttributeMatrixType, DataArrayPath, DataError, NumericType};
use simpl_data::{ArrayElement, ArrayRef, DataArray, DataContainerArray};

use crate::cancel::CancelToken;
use crate::instance::FilterWarning;
use crate::observer::{PipelineEvent, PipelineObserver};

/// Which phase a filter is running in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Dry run: validate paths, create placeholders.
    Preflight,
    /// Real run: allocate outputs, process data.
    Execute,
}

/// Execution context passed to [`Filter::data_check`] and
/// [`Filter::execute`].
///
/// The `create_*` helpers create outputs the right way for the current
/// [`RunMode`]: placeholders in preflight, allocated arrays in execute.
/// Filters should create every output through them so that `data_check`
/// is the same code in both phases.
///
/// [`Filter::data_check`]: crate::Filter::data_check
/// [`Filter::execute`]: crate::Filter::execute
pub struct FilterContext<'a> {
    dca: &'a mut DataContainerArray,
    mode: RunMode,
    cancel: &'a CancelToken,
    observer: &'a dyn PipelineObserver,
    index: usize,
    filter: &'a str,
    warnings: Vec<FilterWarning>,
}

impl<'a> FilterContext<'a> {
    /// Construct a context.
    ///
    /// Normally built by [`FilterInstance`](crate::FilterInstance); tests
    /// may build one directly.
    pub fn new(
        dca: &'a mut DataContainerArray,
        mode: RunMode,
        cancel: &'a CancelToken,
        observer: &'a dyn PipelineObserver,
        index: usize,
        filter: &'a str,
    ) -> Self {
        Self {
            dca,
            mode,
            cancel,
            observer,
            index,
            filter,
            warnings: Vec::new(),
        }
    }

    /// Current phase.
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Whether this is the preflight phase.
    pub fn is_preflight(&self) -> bool {
        self.mode == RunMode::Preflight
    }

    /// Index of the running filter in its pipeline.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The data structure.
    pub fn dca(&self) -> &DataContainerArray {
        &*self.dca
    }

    /// The data structure, mutably.
    pub fn dca_mut(&mut self) -> &mut DataContainerArray {
        &mut *self.dca
    }

    /// Whether cancellation was requested. Filters poll this at safe
    /// points in `execute` and return `ExecuteOutcome::Cancelled`.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ── Reporting ──────────────────────────────────────────────────

    /// Send a status message.
    pub fn notify_status(&self, message: impl Into<String>) {
        self.observer.on_event(&PipelineEvent::Status {
            index: self.index,
            filter: self.filter.to_string(),
            message: message.into(),
        });
    }

    /// Report progress as `completed` of `total` units.
    pub fn notify_progress(&self, completed: usize, total: usize) {
        self.observer.on_event(&PipelineEvent::Progress {
            index: self.index,
            filter: self.filter.to_string(),
            completed,
            total,
        });
    }

    /// Record a warning. Warnings never stop the run.
    pub fn warn(&mut self, code: i32, message: impl Into<String>) {
        let message = message.into();
        self.observer.on_event(&PipelineEvent::Warning {
            index: self.index,
            filter: self.filter.to_string(),
            code,
            message: message.clone(),
        });
        self.warnings.push(FilterWarning { code, message });
    }

    pub(crate) fn into_warnings(self) -> Vec<FilterWarning> {
        self.warnings
    }

    // ── Creating outputs ───────────────────────────────────────────

    /// Create an empty data container.
    pub fn create_data_container(&mut self, name: &str) -> Result<(), DataError> {
        self.dca.create_non_prereq_data_container(name).map(drop)
    }

    /// Create an empty attribute matrix at `path`.
    pub fn create_attribute_matrix(
        &mut self,
        path: &DataArrayPath,
        matrix_type: AttributeMatrixType,
        tuple_dims: &[usize],
    ) -> Result<(), DataError> {
        self.dca
            .create_non_prereq_attribute_matrix(path, matrix_type, tuple_dims)
            .map(drop)
    }

    /// Create a typed output array at `path`: a placeholder in preflight,
    /// allocated with the matrix tuple count and filled with `init` in
    /// execute.
    pub fn create_array<T: ArrayElement>(
        &mut self,
        path: &DataArrayPath,
        component_dims: &[usize],
        init: T,
    ) -> Result<ArrayRef, DataError> {
        match self.mode {
            RunMode::Preflight => {
                self.dca.create_placeholder::<T>(path, component_dims)?;
            }
            RunMode::Execute => {
                self.dca.create_array(path, component_dims, init)?;
            }
        }
        self.dca.array_ref(path)
    }

    /// Create an output array whose element type is chosen at runtime.
    pub fn create_dynamic_array(
        &mut self,
        path: &DataArrayPath,
        numeric_type: NumericType,
        component_dims: &[usize],
        init: f64,
    ) -> Result<ArrayRef, DataError> {
        let placeholder = self.is_preflight();
        self.dca
            .create_dynamic_array(path, numeric_type, component_dims, init, placeholder)?;
        self.dca.array_ref(path)
    }

    // ── Resolving inputs ───────────────────────────────────────────

    /// Check that a typed input exists with the given component shape and
    /// take a handle to it.
    pub fn prereq_array<T: ArrayElement>(
        &self,
        path: &DataArrayPath,
        component_dims: &[usize],
    ) -> Result<ArrayRef, DataError> {
        self.dca.prereq_array::<T>(path, component_dims)?;
        self.dca.array_ref(path)
    }

    /// Check that an input of any element type exists and take a handle
    /// to it.
    pub fn prereq_any_array(&self, path: &DataArrayPath) -> Result<ArrayRef, DataError> {
        self.dca.array_ref(path)
    }

    /// Resolve a handle taken during `data_check`.
    pub fn resolve<T: ArrayElement>(&self, handle: &ArrayRef) -> Result<&DataArray<T>, DataError> {
        self.dca.resolve(handle)
    }

    /// Resolve a handle taken during `data_check`, mutably.
    pub fn resolve_mut<T: ArrayElement>(
        &mut self,
        handle: &ArrayRef,
    ) -> Result<&mut DataArray<T>, DataError> {
        self.dca.resolve_mut(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use std::sync::Mutex;

    fn dca() -> DataContainerArray {
        let mut dca = DataContainerArray::new();
        dca.create_non_prereq_data_container("C").unwrap();
        dca.create_non_prereq_attribute_matrix(
            &DataArrayPath::for_matrix("C", "M"),
            AttributeMatrixType::Generic,
            &[10],
        )
        .unwrap();
        dca
    }

    #[test]
    fn create_array_depends_on_mode() {
        let cancel = CancelToken::new();
        let path = DataArrayPath::new("C", "M", "Y");

        let mut pre = dca();
        let mut ctx = FilterContext::new(&mut pre, RunMode::Preflight, &cancel, &NullObserver, 0, "F");
        let h = ctx.create_array::<f32>(&path, &[1], 0.0).unwrap();
        assert!(ctx.resolve::<f32>(&h).unwrap().is_placeholder());

        let mut exe = dca();
        let mut ctx = FilterContext::new(&mut exe, RunMode::Execute, &cancel, &NullObserver, 0, "F");
        let h = ctx.create_array::<f32>(&path, &[1], 3.0).unwrap();
        let y = ctx.resolve::<f32>(&h).unwrap();
        assert_eq!(y.tuples(), 10);
        assert!(y.as_slice().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn warnings_are_recorded_and_observed() {
        let cancel = CancelToken::new();
        let seen = Mutex::new(Vec::new());
        let observer = |e: &PipelineEvent| seen.lock().unwrap().push(e.clone());
        let mut data = dca();
        let mut ctx = FilterContext::new(&mut data, RunMode::Execute, &cancel, &observer, 3, "F");
        ctx.warn(5, "careful");
        ctx.notify_progress(1, 2);
        let warnings = ctx.into_warnings();
        assert_eq!(
            warnings,
            vec![FilterWarning {
                code: 5,
                message: "careful".into()
            }]
        );
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], PipelineEvent::Warning { index: 3, .. }));
    }

    #[test]
    fn prereq_reports_missing_input() {
        let cancel = CancelToken::new();
        let mut data = dca();
        let ctx = FilterContext::new(&mut data, RunMode::Preflight, &cancel, &NullObserver, 0, "F");
        assert!(matches!(
            ctx.prereq_array::<f32>(&DataArrayPath::new("C", "M", "X"), &[1]),
            Err(DataError::ArrayNotFound { .. })
        ));
    }
}
