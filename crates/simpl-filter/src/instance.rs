//! [`FilterInstance`]: a filter plus its run state.

use simpl_core::FilterError;
use simpl_data::DataContainerArray;
use std::fmt;

use crate::cancel::CancelToken;
use crate::context::{FilterContext, RunMode};
use crate::filter::{ExecuteOutcome, Filter};
use crate::observer::{PipelineEvent, PipelineObserver};

/// Where a filter instance is in the preflight/execute protocol.
///
/// ```text
/// Constructed → Preflighting → PreflightOk | PreflightFailed
///             → Executing    → ExecuteOk | ExecuteFailed | Cancelled
/// ```
///
/// Preflight may be repeated from any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterState {
    /// Never run.
    Constructed,
    /// Inside `data_check` in preflight mode.
    Preflighting,
    /// Last preflight succeeded.
    PreflightOk,
    /// Last preflight failed.
    PreflightFailed,
    /// Inside execute.
    Executing,
    /// Last execute succeeded.
    ExecuteOk,
    /// Last execute failed.
    ExecuteFailed,
    /// Last execute stopped on cancellation.
    Cancelled,
}

impl FilterState {
    /// Whether the state records a failure.
    pub fn is_failed(self) -> bool {
        matches!(self, Self::PreflightFailed | Self::ExecuteFailed)
    }
}

/// A warning recorded by a filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterWarning {
    /// Warning code.
    pub code: i32,
    /// Message.
    pub message: String,
}

/// A boxed filter with its enabled flag, state, last error, and warnings.
pub struct FilterInstance {
    filter: Box<dyn Filter>,
    enabled: bool,
    state: FilterState,
    last_error: Option<FilterError>,
    warnings: Vec<FilterWarning>,
}

impl fmt::Debug for FilterInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterInstance")
            .field("filter", &self.filter.name())
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl<F: Filter> From<F> for FilterInstance {
    fn from(filter: F) -> Self {
        Self::new(Box::new(filter))
    }
}

impl FilterInstance {
    /// Wrap a filter. New instances are enabled.
    pub fn new(filter: Box<dyn Filter>) -> Self {
        Self {
            filter,
            enabled: true,
            state: FilterState::Constructed,
            last_error: None,
            warnings: Vec::new(),
        }
    }

    /// The wrapped filter.
    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    /// The wrapped filter, mutably (to set parameters between runs).
    pub fn filter_mut(&mut self) -> &mut dyn Filter {
        self.filter.as_mut()
    }

    /// Registry name of the wrapped filter.
    pub fn name(&self) -> &str {
        self.filter.name()
    }

    /// Whether the pipeline runs this filter.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Error of the last failed phase.
    pub fn last_error(&self) -> Option<&FilterError> {
        self.last_error.as_ref()
    }

    /// Warnings of the last phase.
    pub fn warnings(&self) -> &[FilterWarning] {
        &self.warnings
    }

    fn begin(&mut self, state: FilterState, mode: RunMode, index: usize, observer: &dyn PipelineObserver) {
        self.state = state;
        self.last_error = None;
        self.warnings.clear();
        observer.on_event(&PipelineEvent::FilterStarted {
            index,
            filter: self.filter.name().to_string(),
            mode,
        });
    }

    fn fail(
        &mut self,
        error: FilterError,
        mode: RunMode,
        index: usize,
        observer: &dyn PipelineObserver,
    ) -> FilterError {
        let name = self.filter.name().to_string();
        tracing::debug!(index, filter = %name, ?mode, code = error.code, "filter failed: {}", error.message);
        self.state = match mode {
            RunMode::Preflight => FilterState::PreflightFailed,
            RunMode::Execute => FilterState::ExecuteFailed,
        };
        self.last_error = Some(error.clone());
        observer.on_event(&PipelineEvent::Error {
            index,
            filter: name.clone(),
            mode,
            code: error.code,
            message: error.message.clone(),
        });
        observer.on_event(&PipelineEvent::FilterFinished {
            index,
            filter: name,
            mode,
            ok: false,
        });
        error
    }

    /// Run `data_check` in preflight mode against `dca`.
    ///
    /// `dca` should be a schema-only container array; preflight never
    /// processes data and may be repeated.
    pub fn preflight(
        &mut self,
        dca: &mut DataContainerArray,
        observer: &dyn PipelineObserver,
        index: usize,
    ) -> Result<(), FilterError> {
        self.begin(FilterState::Preflighting, RunMode::Preflight, index, observer);
        let name = self.filter.name().to_string();
        let never = CancelToken::new();
        let mut ctx = FilterContext::new(dca, RunMode::Preflight, &never, observer, index, &name);
        let result = self.filter.data_check(&mut ctx);
        self.warnings = ctx.into_warnings();
        match result {
            Ok(()) => {
                self.state = FilterState::PreflightOk;
                observer.on_event(&PipelineEvent::FilterFinished {
                    index,
                    filter: name,
                    mode: RunMode::Preflight,
                    ok: true,
                });
                Ok(())
            }
            Err(e) => Err(self.fail(e, RunMode::Preflight, index, observer)),
        }
    }

    /// Re-run `data_check` in execute mode, then `execute`.
    ///
    /// If `cancel` is already set, neither `data_check` nor `execute` runs,
    /// `dca` is left untouched and the outcome is
    /// [`ExecuteOutcome::Cancelled`]. The filter may also return
    /// `Cancelled` itself on observing the flag.
    pub fn execute(
        &mut self,
        dca: &mut DataContainerArray,
        cancel: &CancelToken,
        observer: &dyn PipelineObserver,
        index: usize,
    ) -> Result<ExecuteOutcome, FilterError> {
        self.begin(FilterState::Executing, RunMode::Execute, index, observer);
        let name = self.filter.name().to_string();
        let mut ctx = FilterContext::new(dca, RunMode::Execute, cancel, observer, index, &name);

        let result = if ctx.is_cancelled() {
            Ok(ExecuteOutcome::Cancelled)
        } else {
            self.filter
                .data_check(&mut ctx)
                .and_then(|()| self.filter.execute(&mut ctx))
        };
        self.warnings = ctx.into_warnings();

        match result {
            Ok(ExecuteOutcome::Completed) => {
                self.state = FilterState::ExecuteOk;
                observer.on_event(&PipelineEvent::FilterFinished {
                    index,
                    filter: name,
                    mode: RunMode::Execute,
                    ok: true,
                });
                Ok(ExecuteOutcome::Completed)
            }
            Ok(ExecuteOutcome::Cancelled) => {
                tracing::debug!(index, filter = %name, "filter cancelled");
                self.state = FilterState::Cancelled;
                observer.on_event(&PipelineEvent::Cancelled {
                    index,
                    filter: name,
                });
                Ok(ExecuteOutcome::Cancelled)
            }
            Err(e) => Err(self.fail(e, RunMode::Execute, index, observer)),
        }
    }
}
